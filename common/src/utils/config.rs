use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    pub openrouter_api_key: String,
    #[serde(default = "default_base_url")]
    pub openrouter_base_url: String,
    #[serde(default = "default_model")]
    pub openrouter_model: String,
    pub surrealdb_address: String,
    pub surrealdb_username: String,
    pub surrealdb_password: String,
    pub surrealdb_namespace: String,
    pub surrealdb_database: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openrouter/auto".to_string()
}

fn default_http_port() -> u16 {
    8000
}

// 50MB upload ceiling
fn default_max_file_size() -> usize {
    52_428_800
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: String::new(),
            openrouter_base_url: default_base_url(),
            openrouter_model: default_model(),
            surrealdb_address: "mem://".to_string(),
            surrealdb_username: String::new(),
            surrealdb_password: String::new(),
            surrealdb_namespace: "docuchat".to_string(),
            surrealdb_database: "docuchat".to_string(),
            http_port: default_http_port(),
            max_file_size: default_max_file_size(),
        }
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_openrouter() {
        let config = AppConfig::default();

        assert_eq!(config.openrouter_base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.openrouter_model, "openrouter/auto");
        assert!(config.openrouter_api_key.is_empty());
    }

    #[test]
    fn default_upload_ceiling_is_50_mb() {
        assert_eq!(AppConfig::default().max_file_size, 52_428_800);
    }
}
