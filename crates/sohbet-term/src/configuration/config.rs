#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::ModelName;

const ENV_PREFIX: &str = "SOHBET_";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ChatUrl,
    ConfigFile,
    LogLevel,
    Model,
    UploadUrl,
}

impl ConfigKey {
    pub fn env_var(&self) -> String {
        return format!(
            "{ENV_PREFIX}{}",
            self.to_string().to_uppercase().replace('-', "_")
        );
    }

    fn description(&self) -> &'static str {
        match self {
            ConfigKey::ChatUrl => "Base address of the chat endpoint.",
            ConfigKey::ConfigFile => "Path to the configuration file.",
            ConfigKey::LogLevel => "Log level.",
            ConfigKey::Model => "Model selected at startup.",
            ConfigKey::UploadUrl => "Base address of the document upload endpoint.",
        }
    }

    fn possible_values(&self) -> Vec<String> {
        match self {
            ConfigKey::Model => ModelName::iter().map(|e| e.to_string()).collect(),
            ConfigKey::LogLevel => ["error", "warn", "info", "debug", "trace"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            _ => vec![],
        }
    }
}

/// Resolved settings. Layers, lowest first: built-in defaults, the config
/// file, `SOHBET_*` environment variables, explicit overrides.
#[derive(Debug, Clone)]
pub struct Config {
    values: HashMap<ConfigKey, String>,
}

impl Default for Config {
    fn default() -> Config {
        return Config {
            values: ConfigKey::iter()
                .map(|key| (key, Config::default_value(key)))
                .collect(),
        };
    }
}

impl Config {
    pub fn get(&self, key: ConfigKey) -> String {
        if let Some(val) = self.values.get(&key) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) {
        self.values.insert(key, value.to_string());
    }

    pub fn model(&self) -> ModelName {
        return ModelName::parse(&self.get(ConfigKey::Model)).unwrap_or_default();
    }

    pub fn default_value(key: ConfigKey) -> String {
        let config_path = dirs::config_dir()
            .map(|dir| dir.join("sohbet/config.toml"))
            .and_then(|path| path.to_str().map(|e| e.to_string()))
            .unwrap_or_default();

        let res = match key {
            ConfigKey::ChatUrl => "http://localhost:3001".to_string(),
            ConfigKey::UploadUrl => "http://localhost:3001".to_string(),
            ConfigKey::Model => ModelName::default().to_string(),
            ConfigKey::LogLevel => "info".to_string(),
            ConfigKey::ConfigFile => config_path,
        };

        return res;
    }

    fn validated_set(&mut self, key: ConfigKey, value: &str, source: &str) -> Result<()> {
        let possible_values = key.possible_values();
        if !possible_values.is_empty() && !possible_values.contains(&value.to_string()) {
            bail!(format!(
                "{source} has an invalid value for key '{key}': {value}\nPossible values are: {}",
                possible_values.join(", ")
            ));
        }

        self.set(key, value);
        return Ok(());
    }

    pub async fn load(overrides: &[(ConfigKey, Option<String>)]) -> Result<Config> {
        let mut config = Config::default();

        let mut config_file = config.get(ConfigKey::ConfigFile);
        if let Ok(val) = env::var(ConfigKey::ConfigFile.env_var()) {
            config_file = val;
        }
        for (key, val) in overrides {
            if let (ConfigKey::ConfigFile, Some(val)) = (key, val) {
                config_file = val.to_string();
            }
        }
        config.set(ConfigKey::ConfigFile, &config_file);

        let config_path = path::PathBuf::from(&config_file);
        if !config_file.is_empty() && config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            config.merge_toml(&toml_str)?;
        }

        for key in ConfigKey::iter() {
            if let Ok(val) = env::var(key.env_var()) {
                if val.is_empty() {
                    continue;
                }
                config.validated_set(key, &val, &key.env_var())?;
            }
        }

        for (key, val) in overrides {
            if let Some(val) = val {
                if val.is_empty() {
                    continue;
                }
                config.validated_set(*key, val, "command line")?;
            }
        }

        tracing::debug!(
            chat_url = config.get(ConfigKey::ChatUrl),
            upload_url = config.get(ConfigKey::UploadUrl),
            model = config.get(ConfigKey::Model),
            "config"
        );

        return Ok(config);
    }

    fn merge_toml(&mut self, toml_str: &str) -> Result<()> {
        let doc = toml_str.parse::<toml_edit::Document>()?;

        for key in ConfigKey::iter() {
            if key == ConfigKey::ConfigFile {
                continue;
            }

            if let Some(val) = doc.get(&key.to_string()) {
                if let Some(val_int) = val.as_integer() {
                    self.validated_set(key, &val_int.to_string(), "config.toml")?;
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }
                    self.validated_set(key, val_str, "config.toml")?;
                }
            }
        }

        return Ok(());
    }

    /// A commented `config.toml` holding every default.
    pub fn serialize_default() -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let mut description = key.description().to_string();
                let possible_values = key.possible_values();
                if !possible_values.is_empty() {
                    description = format!(
                        "{description} [possible values: {}]",
                        possible_values.join(", ")
                    );
                }

                let val = Config::default_value(key);
                return Some(format!("# {description}\n{key} = \"{val}\""));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
