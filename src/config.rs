//! Configuration for Telegram API credentials and session naming
//!
//! Loads configuration from config.yml file; environment variables (and a
//! `.env` file) take precedence.

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Default session file prefix
pub const SESSION_NAME: &str = "user_session";
pub const CONFIG_FILE: &str = "config.yml";

/// Sample values shipped in config templates; never valid credentials.
pub const PLACEHOLDER_API_ID: i32 = 12345;
pub const PLACEHOLDER_API_HASH: &str = "your_api_hash_here";

/// Printed when credentials are missing or still set to placeholders.
pub const CREDENTIALS_HELP: &str = r#"
❌ Пожалуйста, настройте api_id и api_hash в файле config.yml
   (или переменные окружения TELEGRAM_API_ID и TELEGRAM_API_HASH)

📋 Как получить API_ID и API_HASH:
1. Перейдите на https://my.telegram.org
2. Войдите с вашим номером телефона
3. Перейдите в 'API development tools'
4. Создайте новое приложение
5. Скопируйте API_ID и API_HASH
"#;

/// YAML config structures
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct TelegramConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    phone: Option<String>,
    session_name: Option<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub api_id: i32,
    pub api_hash: String,
    pub phone: String,
    pub session_name: String,
}

impl Config {
    /// Load configuration from config.yml (here or one directory up), or from
    /// the environment alone when neither file exists.
    pub fn new() -> Result<Self> {
        Self::load_first([
            Path::new(CONFIG_FILE).to_path_buf(),
            Path::new("..").join(CONFIG_FILE),
        ])
    }

    /// Load the first config file that exists. A file that exists but cannot
    /// be read or parsed is an error.
    pub fn load_first<I>(paths: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        for path in paths {
            match Self::load_from_file(path.as_ref()) {
                Ok(config) => {
                    debug!("Loaded configuration from {}", path.as_ref().display());
                    return Ok(config);
                }
                Err(Error::IoError(err)) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(err),
            }
        }

        debug!("No {} found, using environment only", CONFIG_FILE);
        Self::load_dotenv();
        Ok(Self::from_yaml(YamlConfig::default()))
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())?;
        let yaml: YamlConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(Self::from_yaml(yaml))
    }

    fn from_yaml(yaml: YamlConfig) -> Self {
        let telegram = yaml.telegram.unwrap_or_default();

        let session_name = Self::resolve_env_string(telegram.session_name, "TELEGRAM_SESSION_NAME");

        Self {
            api_id: Self::resolve_env_i32(telegram.api_id, "TELEGRAM_API_ID"),
            api_hash: Self::resolve_env_string(telegram.api_hash, "TELEGRAM_API_HASH"),
            phone: Self::resolve_env_string(telegram.phone, "TELEGRAM_PHONE"),
            session_name: if session_name.is_empty() {
                SESSION_NAME.to_string()
            } else {
                session_name
            },
        }
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Extract VAR from a `${VAR}` placeholder
    fn placeholder_var(value: &str) -> Option<&str> {
        value.strip_prefix("${").and_then(|v| v.strip_suffix('}'))
    }

    /// Resolve a value: `${VAR}` placeholders first, then the explicit env key
    fn resolve_env_string(value: Option<String>, env_key: &str) -> String {
        if let Some(var_name) = value.as_deref().and_then(Self::placeholder_var) {
            if let Ok(env_val) = std::env::var(var_name) {
                return env_val;
            }
        }
        if let Ok(env_val) = std::env::var(env_key) {
            return env_val;
        }
        match value {
            Some(v) if Self::placeholder_var(&v).is_some() => String::new(),
            Some(v) => v,
            None => String::new(),
        }
    }

    /// Resolve an integer the same way as a string; unparsable values are 0
    fn resolve_env_i32(value: Option<String>, env_key: &str) -> i32 {
        let parse = |s: &str| s.trim().parse::<i32>().ok();

        if let Some(var_name) = value.as_deref().and_then(Self::placeholder_var) {
            if let Some(parsed) = std::env::var(var_name).ok().as_deref().and_then(parse) {
                return parsed;
            }
        }
        if let Some(parsed) = std::env::var(env_key).ok().as_deref().and_then(parse) {
            return parsed;
        }
        value.as_deref().and_then(parse).unwrap_or(0)
    }

    /// Refuse unset or sample credentials before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.api_id == 0 || self.api_id == PLACEHOLDER_API_ID {
            return Err(Error::Configuration(
                "api_id is not set or still the sample value".to_string(),
            ));
        }
        let hash = self.api_hash.trim();
        if hash.is_empty() || hash == PLACEHOLDER_API_HASH {
            return Err(Error::Configuration(
                "api_hash is not set or still the sample value".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the sqlite session file
    pub fn session_file(&self) -> String {
        format!("{}.session", self.session_name)
    }

    /// Path of the cross-process lock file
    pub fn lock_file(&self) -> String {
        format!("{}.lock", self.session_name)
    }
}
