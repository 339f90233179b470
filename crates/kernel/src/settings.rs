use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "STOREFRONT_ENV";
const CONFIG_DIR_ENV: &str = "STOREFRONT_CONFIG_DIR";
const ENV_PREFIX: &str = "STOREFRONT";

/// Bot token variables honored when `media.bot_token` is not configured.
const BOT_TOKEN_FALLBACK_VARS: &[&str] = &["TELEGRAM_BOT_TOKEN", "NEXT_PUBLIC_TELEGRAM_BOT_TOKEN"];

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub media: MediaSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        let mut settings = Self::load_from(&config_dir, &environment)?;

        if settings.media.bot_token.is_empty() {
            if let Some(token) = BOT_TOKEN_FALLBACK_VARS
                .iter()
                .find_map(|name| std::env::var(name).ok())
            {
                settings.media.bot_token = token;
            }
        }

        Ok(settings)
    }

    /// Load `base.toml` and `{environment}.toml` from `config_dir`, then apply
    /// `STOREFRONT__*` environment overrides.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    /// Whole-request deadline; none unless configured.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Directory served for static assets such as the fallback image.
    #[serde(default = "ServerSettings::default_static_dir")]
    pub static_dir: String,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_static_dir() -> String {
        "public".to_string()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: None,
            static_dir: Self::default_static_dir(),
        }
    }
}

/// Upstream product API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "ApiSettings::default_base_url")]
    pub base_url: String,
    /// No timeout unless configured.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ApiSettings {
    fn default_base_url() -> String {
        "http://localhost:3001".to_string()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_ms: None,
        }
    }
}

/// Third-party file-location API used to resolve image references.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    #[serde(default = "MediaSettings::default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "MediaSettings::default_fallback_image")]
    pub fallback_image: String,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl MediaSettings {
    fn default_api_base() -> String {
        "https://api.telegram.org".to_string()
    }

    fn default_fallback_image() -> String {
        "/fallback-image.jpg".to_string()
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            api_base: Self::default_api_base(),
            bot_token: String::new(),
            fallback_image: Self::default_fallback_image(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// Look up every primary image through the media API. When disabled,
    /// absolute URLs are used as-is and anything else is served locally.
    #[serde(default = "CatalogSettings::default_resolve_images")]
    pub resolve_images: bool,
}

impl CatalogSettings {
    fn default_resolve_images() -> bool {
        true
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            resolve_images: Self::default_resolve_images(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_api_points_at_local_product_service() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:3001");
        assert_eq!(settings.api.timeout_ms, None);
        assert_eq!(settings.server.request_timeout_ms, None);
    }

    #[test]
    fn default_media_settings() {
        let settings = Settings::default();
        assert_eq!(settings.media.api_base, "https://api.telegram.org");
        assert_eq!(settings.media.fallback_image, "/fallback-image.jpg");
        assert!(settings.media.bot_token.is_empty());
        assert!(settings.catalog.resolve_images);
    }

    #[test]
    fn layered_files_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[api]\nbase_url = \"http://products.internal\"\n\n[server]\nport = 4000\nrequest_timeout_ms = 2500\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.toml"),
            "[catalog]\nresolve_images = false\n",
        )
        .unwrap();

        let settings = Settings::load_from(dir.path(), "staging").unwrap();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.api.base_url, "http://products.internal");
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.server.request_timeout_ms, Some(2500));
        assert!(!settings.catalog.resolve_images);
        assert_eq!(settings.media.fallback_image, "/fallback-image.jpg");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(dir.path(), "qa").unwrap_err();
        assert!(err.to_string().contains("unsupported environment"));
    }
}
