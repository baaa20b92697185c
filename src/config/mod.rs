mod database;
mod errors;
mod jwt;
mod logging;
mod settings;

pub use database::{init_database, migrate_database};
pub use errors::ConfigError;
pub use jwt::{JwtSettings, TOKEN_LIFETIME_SECONDS};
pub use logging::init_logging;
pub use settings::AppSettings;
