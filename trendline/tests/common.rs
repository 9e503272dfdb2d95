#![allow(dead_code)]

use chrono::NaiveDate;
use trendline::{KeywordQuery, MergedSeries, OutputSink, TrendsError};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Sink keeping every series in memory.
#[derive(Default)]
pub struct VecSink {
    pub written: Vec<(KeywordQuery, MergedSeries)>,
}

impl VecSink {
    pub fn keywords(&self) -> Vec<String> {
        self.written.iter().map(|(q, _)| q.raw_text.clone()).collect()
    }
}

impl OutputSink for VecSink {
    fn write(&mut self, query: &KeywordQuery, merged: &MergedSeries) -> Result<(), TrendsError> {
        self.written.push((query.clone(), merged.clone()));
        Ok(())
    }
}

/// Sink that refuses every write.
pub struct BrokenSink;

impl OutputSink for BrokenSink {
    fn write(&mut self, _query: &KeywordQuery, _merged: &MergedSeries) -> Result<(), TrendsError> {
        Err(TrendsError::Sink("disk full".into()))
    }
}
