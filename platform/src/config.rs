pub mod connector_config;

use log::info;
use serde::Deserialize;
use thiserror::Error;

pub use config::FileFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file error: {message}")]
    FileError { message: String },
    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

pub struct Config {
    settings: config::Config,
}

impl Config {
    pub fn from_json(filepath: &str) -> Result<Self, ConfigError> {
        Self::load(filepath, FileFormat::Json, None)
    }

    pub fn from_yaml(filepath: &str) -> Result<Self, ConfigError> {
        Self::load(filepath, FileFormat::Yaml, None)
    }

    pub fn from_toml(filepath: &str) -> Result<Self, ConfigError> {
        Self::load(filepath, FileFormat::Toml, None)
    }

    /// 文件之上叠加环境变量，如 prefix 为 ALPHA 时 ALPHA_BINANCE__API_KEY 覆盖 binance.api_key
    pub fn from_file_with_env(
        filepath: &str,
        format: FileFormat,
        env_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let environment = config::Environment::with_prefix(env_prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        Self::load(filepath, format, Some(environment))
    }

    fn load(
        filepath: &str,
        format: FileFormat,
        environment: Option<config::Environment>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            config::builder::ConfigBuilder::<config::builder::DefaultState>::default()
                .add_source(config::File::with_name(filepath).format(format));
        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }
        builder
            .build()
            .map(|settings| {
                info!("config loaded from {}", filepath);
                Config { settings }
            })
            .map_err(|e| ConfigError::FileError {
                message: e.to_string(),
            })
    }

    pub fn get<'de, T: Deserialize<'de>>(&self, key: &str) -> Result<T, ConfigError> {
        self.settings
            .get::<T>(key)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_json_config() {
        let mut tempfile = NamedTempFile::new().unwrap();
        writeln!(tempfile, r#"{{ "binance": {{ "api_key": "my_api_key" }} }}"#).unwrap();
        let config = Config::from_json(tempfile.path().to_str().unwrap()).unwrap();
        let api_key: String = config.get("binance.api_key").unwrap();
        assert_eq!(api_key, "my_api_key");
    }

    #[test]
    fn test_load_yaml_config() {
        let mut tempfile = NamedTempFile::new().unwrap();
        writeln!(tempfile, "binance:\n  enable_alpha: true").unwrap();
        let config = Config::from_yaml(tempfile.path().to_str().unwrap()).unwrap();
        let enabled: bool = config.get("binance.enable_alpha").unwrap();
        assert!(enabled);
    }

    #[test]
    fn test_load_toml_config() {
        let mut tempfile = NamedTempFile::new().unwrap();
        writeln!(tempfile, "[binance]\nbalance_cache_ttl_secs = 15").unwrap();
        let config = Config::from_toml(tempfile.path().to_str().unwrap()).unwrap();
        let ttl: u64 = config.get("binance.balance_cache_ttl_secs").unwrap();
        assert_eq!(ttl, 15);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_json("/nonexistent/alpha_connector.json");
        assert!(matches!(result, Err(ConfigError::FileError { .. })));
    }

    #[test]
    fn test_missing_key() {
        let mut tempfile = NamedTempFile::new().unwrap();
        writeln!(tempfile, r#"{{ "binance": {{}} }}"#).unwrap();
        let config = Config::from_json(tempfile.path().to_str().unwrap()).unwrap();
        let result = config.get::<String>("binance.api_key");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut tempfile = NamedTempFile::new().unwrap();
        writeln!(
            tempfile,
            r#"{{ "binance": {{ "api_key": "from_file", "secret_key": "file_secret", "enable_alpha": false }} }}"#
        )
        .unwrap();

        // 前缀只在本测试中使用，不与其他测试共享环境变量
        unsafe {
            std::env::set_var("ALPHACFGTEST_BINANCE__API_KEY", "from_env");
            std::env::set_var("ALPHACFGTEST_BINANCE__ENABLE_ALPHA", "true");
        }
        let config = Config::from_file_with_env(
            tempfile.path().to_str().unwrap(),
            FileFormat::Json,
            "ALPHACFGTEST",
        );
        unsafe {
            std::env::remove_var("ALPHACFGTEST_BINANCE__API_KEY");
            std::env::remove_var("ALPHACFGTEST_BINANCE__ENABLE_ALPHA");
        }

        let config = config.unwrap();
        let api_key: String = config.get("binance.api_key").unwrap();
        let secret_key: String = config.get("binance.secret_key").unwrap();
        let enable_alpha: bool = config.get("binance.enable_alpha").unwrap();
        assert_eq!(api_key, "from_env");
        assert_eq!(secret_key, "file_secret");
        assert!(enable_alpha);
    }

    #[test]
    fn test_env_overlay_without_vars_keeps_file() {
        let mut tempfile = NamedTempFile::new().unwrap();
        writeln!(tempfile, r#"{{ "binance": {{ "api_key": "from_file" }} }}"#).unwrap();

        let config = Config::from_file_with_env(
            tempfile.path().to_str().unwrap(),
            FileFormat::Json,
            "ALPHACFGUNSET",
        )
        .unwrap();
        let api_key: String = config.get("binance.api_key").unwrap();
        assert_eq!(api_key, "from_file");
    }
}
