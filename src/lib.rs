// src/lib.rs
// DOCUMENTATION: Library root shared by the HTTP service and the ingestion job
// PURPOSE: Expose config, store, models, services and handlers to both binaries

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

/// Initialize env_logger, honoring RUST_LOG first and the configured level second
pub fn init_logging(config: &config::Config) {
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    if env_logger::try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Read configuration from the environment, start logging, then validate.
/// Logging comes first so warnings raised by validation are not dropped.
pub fn load_config() -> Result<config::Config, String> {
    let config = config::Config::from_env();
    init_logging(&config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_installed_before_validation() {
        let config = load_config().expect("config should validate");
        assert!(!config.database_url.is_empty());
        // Nothing is enabled until a logger has been installed
        assert!(log::log_enabled!(log::Level::Error));
    }
}
