use std::env;

use thiserror::Error;

use crate::models::RawStudentRecord;

const DEFAULT_LEARNER_ROLES: &[&str] = &["aprendiz", "apprentice", "learner"];
const DEFAULT_ACTIVE_STATUSES: &[&str] = &[
    "activo",
    "active",
    "en formación",
    "en formacion",
    "in training",
];

/// Role and status allow-lists shared by every engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    pub learner_roles: Vec<String>,
    pub active_statuses: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            learner_roles: DEFAULT_LEARNER_ROLES.iter().map(|s| s.to_string()).collect(),
            active_statuses: DEFAULT_ACTIVE_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RankingConfig {
    pub fn is_learner(&self, record: &RawStudentRecord) -> bool {
        matches_any(record.tipo_usuario.as_deref(), &self.learner_roles)
    }

    pub fn is_active(&self, record: &RawStudentRecord) -> bool {
        matches_any(record.estado.as_deref(), &self.active_statuses)
    }

    pub fn is_active_learner(&self, record: &RawStudentRecord) -> bool {
        self.is_learner(record) && self.is_active(record)
    }
}

fn matches_any(value: Option<&str>, allowed: &[String]) -> bool {
    let Some(value) = value.map(str::trim) else {
        return false;
    };
    let value = value.to_lowercase();
    allowed
        .iter()
        .any(|candidate| candidate.trim().to_lowercase() == value)
}

/// Top-level configuration for the command line tool.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ranking: RankingConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut ranking = RankingConfig::default();
        if let Ok(value) = env::var("WORDZY_LEARNER_ROLES") {
            ranking.learner_roles = parse_list("WORDZY_LEARNER_ROLES", &value)?;
        }
        if let Ok(value) = env::var("WORDZY_ACTIVE_STATUSES") {
            ranking.active_statuses = parse_list("WORDZY_ACTIVE_STATUSES", &value)?;
        }

        let log_level = env::var("WORDZY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            ranking,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_list(key: &'static str, value: &str) -> Result<Vec<String>, ConfigError> {
    let items: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        return Err(ConfigError::EmptyList { key });
    }
    Ok(items)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must list at least one comma separated value")]
    EmptyList { key: &'static str },
}
