use std::env;

use crate::models::{RuleError, RuleSet};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub business_name: String,
    pub rules: RuleSet,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, RuleError> {
        let rules = match env::var("SCHEDULE_RULES") {
            Ok(json) if !json.trim().is_empty() => RuleSet::from_json(&json)?,
            _ => RuleSet::interview_default(),
        };

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "slotbook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "Interviews".to_string()),
            rules,
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}
