use crate::config::toml_config::{TomlConfig, DEFAULT_CONFIG_PATH};
use crate::utils::error::{Result, StatsError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "module-stats")]
#[command(about = "HTTP API computing module stats from linear coefficients")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port (falls back to the PORT environment variable)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override data.files
    #[arg(long, value_delimiter = ',')]
    pub data: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Load and validate module data, print a summary and exit
    #[arg(long)]
    pub check: bool,
}

impl CliConfig {
    /// 合併設定來源：TOML 檔案 -> 環境變數 -> 命令列參數
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path).map_err(|e| StatsError::ConfigError {
                message: format!("failed to load config file '{}': {}", path, e),
            })?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                TomlConfig::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => TomlConfig::default(),
        };

        self.apply_overrides(&mut config, std::env::var("PORT").ok().as_deref())?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut TomlConfig, port_env: Option<&str>) -> Result<()> {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }

        match (self.port, port_env) {
            (Some(port), _) => config.server.port = port,
            (None, Some(value)) => {
                config.server.port =
                    value
                        .parse()
                        .map_err(|_| StatsError::InvalidConfigValueError {
                            field: "PORT".to_string(),
                            value: value.to_string(),
                            reason: "must be a port number".to_string(),
                        })?;
            }
            (None, None) => {}
        }

        if !self.data.is_empty() {
            config.data.files = self.data.clone();
        }

        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig::parse_from([
            "module-stats",
            "--host",
            "127.0.0.1",
            "--port",
            "9001",
            "--data",
            "a.json,b.json",
            "--json-logs",
        ]);

        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config, Some("7000")).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.data.files, vec!["a.json", "b.json"]);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_port_env_fallback() {
        let cli = CliConfig::parse_from(["module-stats"]);

        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config, Some("7000")).unwrap();
        assert_eq!(config.server.port, 7000);

        assert!(cli.apply_overrides(&mut config, Some("seven")).is_err());
    }
}
