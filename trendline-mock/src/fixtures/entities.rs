use trendline_core::Entity;

pub fn by_keyword(keyword: &str) -> Vec<Entity> {
    match keyword {
        "Apple" => vec![
            Entity::new("/m/0k8z", "Apple Inc", "Consumer electronics company"),
            Entity::new("/m/014j1m", "Apple", "Fruit"),
        ],
        "Tesla" => vec![
            Entity::new("/m/05b5c", "Nikola Tesla", "Inventor"),
            Entity::new("/m/0dr90d", "Tesla Motors", "Automotive company"),
        ],
        "Goldman Sachs Securities" => vec![Entity::new(
            "/m/01xdn1",
            "Goldman Sachs",
            "Investment banking company",
        )],
        "Pizza Hut" => vec![Entity::new("/m/0f8k2", "Pizza Hut", "Restaurant")],
        _ => vec![],
    }
}
