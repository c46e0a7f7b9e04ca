use serde::{Deserialize, Serialize};

/// Virtual category id meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub price_cents: i64,
    pub category_id: String,
}

/// The service catalog scoped to one tenant: its categories plus every
/// bookable service.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub services: Vec<Service>,
}

impl Catalog {
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Services visible under a category filter. The tenant's category list is
    /// authoritative: services pointing at a category the tenant doesn't carry
    /// are hidden even under the "all" filter.
    pub fn visible_services(&self, category_id: &str) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|s| {
                let known = self.categories.iter().any(|c| c.id == s.category_id);
                if category_id == ALL_CATEGORIES {
                    known
                } else {
                    known && s.category_id == category_id
                }
            })
            .collect()
    }
}

/// Extracts the leading integer from a "<n> minutes"-shaped duration string.
/// Total: malformed input parses to 0.
pub fn parse_duration_minutes(raw: &str) -> u32 {
    raw.trim()
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Parses a currency-formatted decimal ("$20.00", "$1,200.00", "15.5") into
/// integer cents. Currency prefixes and thousands separators are stripped.
/// Total: malformed input parses to 0.
pub fn parse_price_cents(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let start = match trimmed.find(|c: char| c.is_ascii_digit()) {
        Some(i) => i,
        None => return 0,
    };
    let cleaned: String = trimmed[start..]
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned
        .parse::<f64>()
        .map(|v| (v * 100.0).round() as i64)
        .unwrap_or(0)
}

pub fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}
