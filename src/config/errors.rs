/// Fatal misconfiguration detected at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required setting '{0}' is missing or empty")]
    MissingSetting(String),

    #[error("Invalid value for setting '{name}': {reason}")]
    InvalidSetting { name: String, reason: String },
}
