use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub site_domain: String,
    pub database_url: String,
    pub hours_cache_max_age_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "https://et.robolons.com/api".to_string()),
            site_domain: env::var("SITE_DOMAIN").unwrap_or_else(|_| "et.robolons.com".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "bookline.db".to_string()),
            hours_cache_max_age_minutes: env::var("HOURS_CACHE_MAX_AGE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24 * 60),
        }
    }
}
