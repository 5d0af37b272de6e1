use crate::adapters::LocalModuleSource;
use crate::core::QualityPolicy;
use crate::utils::error::{Result, StatsError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "module-stats.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub quality: QualityPolicy,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub files: Vec<String>,
    pub base_dir: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            files: vec![
                "data/modules/add_on_modules.json".to_string(),
                "data/modules/concept_modules.json".to_string(),
                "data/modules/deviation_modules.json".to_string(),
            ],
            base_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StatsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StatsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PORT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        if self.server.host.contains(char::is_whitespace) {
            return Err(StatsError::InvalidConfigValueError {
                field: "server.host".to_string(),
                value: self.server.host.clone(),
                reason: "Host cannot contain whitespace".to_string(),
            });
        }

        if self.data.files.is_empty() {
            return Err(StatsError::MissingConfigError {
                field: "data.files".to_string(),
            });
        }
        for file in &self.data.files {
            validation::validate_path("data.files", file)?;
        }
        validation::validate_file_extensions("data.files", &self.data.files, &["json"])?;
        if let Some(base_dir) = &self.data.base_dir {
            validation::validate_path("data.base_dir", base_dir)?;
        }

        validation::validate_finite("quality.min", self.quality.min)?;
        if let Some(max) = self.quality.max {
            validation::validate_finite("quality.max", max)?;
            if max < self.quality.min {
                return Err(StatsError::InvalidConfigValueError {
                    field: "quality.max".to_string(),
                    value: max.to_string(),
                    reason: format!("must not be below quality.min ({})", self.quality.min),
                });
            }
        }

        validation::validate_non_empty_string("logging.level", &self.logging.level)?;

        Ok(())
    }

    /// `host:port`，host 可以是主機名稱
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn module_source(&self) -> LocalModuleSource {
        let source = LocalModuleSource::new(self.data.files.clone());
        match &self.data.base_dir {
            Some(base_dir) => source.with_base_path(base_dir),
            None => source,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000
cors = false

[data]
files = ["rings.json"]
base_dir = "/srv/modules"

[quality]
min = 0.0
max = 100.0

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.port, 9000);
        assert!(!config.server.cors);
        assert_eq!(config.data.files, vec!["rings.json"]);
        assert_eq!(config.quality.max, Some(100.0));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.listen_address(), "127.0.0.1:9000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.data.files.len(), 3);
        assert_eq!(config.quality, QualityPolicy::default());
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MODULE_STATS_TEST_PORT", "9123");

        let toml_content = r#"
[server]
port = ${MODULE_STATS_TEST_PORT}
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.port, 9123);

        std::env::remove_var("MODULE_STATS_TEST_PORT");
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            "[server]\nhost = \"\"",
            "[server]\nhost = \"not an address\"",
            "[server]\nport = 0",
            "[data]\nfiles = []",
            "[data]\nfiles = [\"modules.yaml\"]",
            "[quality]\nmin = 10.0\nmax = 5.0",
            "[quality]\nmin = nan",
        ];

        for content in invalid {
            let config = TomlConfig::from_toml_str(content).unwrap();
            assert!(config.validate().is_err(), "expected invalid: {}", content);
        }

        assert!(TomlConfig::from_toml_str("[logging]\nformat = \"xml\"").is_err());

        let err = TomlConfig::from_toml_str("[server]\nport = 0")
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("between 1 and 65535"), "{}", err);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8181\n\n[data]\nfiles = [\"a.json\"]\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 8181);
        assert_eq!(config.module_source().files(), ["a.json".to_string()]);
    }
}
