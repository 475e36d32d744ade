use serde::Deserialize;
use std::env;

use crate::services::performance_tracker::TrackerSettings;

const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_problems_per_request: u32,
    pub adaptive: TrackerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            max_problems_per_request: 100,
            adaptive: TrackerSettings::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Local .env is optional
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let defaults = Config::default();

        let host = settings
            .get_string("server.host")
            .or_else(|_| env::var("HOST"))
            .unwrap_or(defaults.host);

        let port = match settings.get_int("server.port") {
            Ok(port) => u16::try_from(port).map_err(|_| {
                config::ConfigError::Message(format!("server.port out of range: {}", port))
            })?,
            Err(_) => match env::var("PORT") {
                Ok(raw) => raw.parse().map_err(|_| {
                    config::ConfigError::Message(format!("PORT is not a valid port: {}", raw))
                })?,
                Err(_) => defaults.port,
            },
        };

        let cors_origins = settings
            .get_array("server.cors_origins")
            .ok()
            .map(|values| {
                values
                    .into_iter()
                    .filter_map(|value| value.into_string().ok())
                    .collect::<Vec<_>>()
            })
            .or_else(|| env::var("CORS_ORIGINS").ok().map(|raw| split_list(&raw)))
            .unwrap_or(defaults.cors_origins);

        let max_problems_per_request = match settings.get_int("limits.max_problems_per_request") {
            Ok(limit) => u32::try_from(limit).map_err(|_| {
                config::ConfigError::Message(format!(
                    "limits.max_problems_per_request out of range: {}",
                    limit
                ))
            })?,
            Err(_) => env::var("MAX_PROBLEMS_PER_REQUEST")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.max_problems_per_request),
        };

        // Missing keys fall back to TrackerSettings defaults field by field
        let adaptive = match settings.get::<TrackerSettings>("adaptive") {
            Ok(adaptive) => adaptive,
            Err(config::ConfigError::NotFound(_)) => defaults.adaptive,
            Err(e) => return Err(e),
        };

        Ok(Config {
            host,
            port,
            cors_origins,
            max_problems_per_request,
            adaptive,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
