use chrono::{Datelike, Duration, NaiveDate};
use trendline_core::DateWindow;
use trendline_core::normalize::INTEREST_OVER_TIME_HEADER;

/// Windows longer than this are reported weekly, as the portal does.
const DAILY_LIMIT_DAYS: i64 = 90;

// Deterministic 1..=100 level from the day and topic; never zero.
fn level(topic: &str, date: NaiveDate) -> u32 {
    let seed = topic.bytes().map(u32::from).sum::<u32>();
    let day = u32::try_from(date.num_days_from_ce()).unwrap_or(0);
    1 + (seed.wrapping_add(day.wrapping_mul(7)) % 100)
}

pub fn interest(topic: &str, window: DateWindow) -> String {
    let mut out = format!(
        "Web Search interest: {topic}\nWorldwide; {}\n\n{INTEREST_OVER_TIME_HEADER}\n",
        window.start().format("%Y")
    );
    let mut day = window.start();
    if window.days() > DAILY_LIMIT_DAYS {
        out.push_str(&format!("Week,{topic}\n"));
        while day <= window.end() {
            let end = day + Duration::days(6);
            out.push_str(&format!("{day} - {end},{}\n", level(topic, day)));
            day += Duration::days(7);
        }
    } else {
        out.push_str(&format!("Day,{topic}\n"));
        while day <= window.end() {
            out.push_str(&format!("{day},{}\n", level(topic, day)));
            day += Duration::days(1);
        }
    }
    out.push_str(&format!("\nTop regions for {topic}\nRegion,{topic}\nAustralia,100\n"));
    out
}

pub fn no_interest(topic: &str, window: DateWindow) -> String {
    format!(
        "Web Search interest: {topic}\nWorldwide; {}\n\n",
        window.start().format("%b %Y")
    )
}
