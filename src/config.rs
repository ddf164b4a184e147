use std::env;

use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Manila;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub timezone: Tz,
    pub property_name: String,
    pub notify_webhook_url: Option<String>,
    pub notify_webhook_secret: Option<String>,
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "staybook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            timezone: parse_timezone(env::var("TIMEZONE").ok().as_deref()),
            property_name: env::var("PROPERTY_NAME")
                .unwrap_or_else(|_| "Staybook Unit".to_string()),
            notify_webhook_url: non_empty_var("NOTIFY_WEBHOOK_URL"),
            notify_webhook_secret: non_empty_var("NOTIFY_WEBHOOK_SECRET"),
            cors_allow_origin: non_empty_var("CORS_ALLOW_ORIGIN"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn parse_timezone(raw: Option<&str>) -> Tz {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_TIMEZONE,
        Some(name) => name.parse().unwrap_or_else(|_| {
            tracing::warn!(timezone = %name, "unknown timezone, using {DEFAULT_TIMEZONE}");
            DEFAULT_TIMEZONE
        }),
    }
}
