use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Default Gemini REST root.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for every route.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default request body limit (20MB), large enough for short audio clips and PDFs.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    /// Upstream request timeout; `None` waits for the provider indefinitely.
    pub timeout_secs: Option<u64>,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Directory holding staged uploads; created at startup if missing.
    pub dir: String,
    pub max_bytes: usize,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").as_deref() == Some("prod");
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let api_key = get("GEMINI_API_KEY", None)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_KEY is set but empty"
            )));
        }

        let timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => Some(parse_number("GEMINI_TIMEOUT_SECS", &raw)?),
            _ => None,
        };

        let max_bytes = parse_number(
            "MAX_UPLOAD_BYTES",
            &get("MAX_UPLOAD_BYTES", Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()))?,
        )?;

        Ok(RelayConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: get("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL))?,
                api_base: get("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs,
            },
            uploads: UploadSettings {
                dir: get("UPLOAD_DIR", Some("uploads"))?,
                max_bytes,
            },
        })
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
    })
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if let Some(def) = default {
                // Hard defaults (model, paths, limits) are safe in every environment.
                Ok(def.to_string())
            } else if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RelayConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(core_config::Config::default(), |key| vars.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = load(&[("GEMINI_API_KEY", "secret")]).unwrap();

        assert_eq!(config.common.port, 3000);
        assert_eq!(config.gemini.api_key.expose_secret(), "secret");
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.gemini.api_base, DEFAULT_GEMINI_API_BASE);
        assert!(config.gemini.timeout().is_none());
        assert_eq!(config.uploads.dir, "uploads");
        assert_eq!(config.uploads.max_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let err = load(&[("GEMINI_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_API_BASE", "http://127.0.0.1:9999/v1beta/"),
            ("GEMINI_TIMEOUT_SECS", "30"),
            ("UPLOAD_DIR", "/tmp/relay"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();

        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.api_base, "http://127.0.0.1:9999/v1beta");
        assert_eq!(config.gemini.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.uploads.dir, "/tmp/relay");
        assert_eq!(config.uploads.max_bytes, 1024);
    }

    #[test]
    fn rejects_invalid_numbers() {
        let err = load(&[("GEMINI_API_KEY", "k"), ("MAX_UPLOAD_BYTES", "lots")]).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_BYTES"));
    }
}
