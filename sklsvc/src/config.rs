//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `SKLSVC_CONFIG`
//! environment variable.
//!
//! Sources are merged in order (later overrides earlier):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `SKLSVC_` override YAML values
//!
//! For nested config values, use double underscores. For example,
//! `SKLSVC_IMAGE_HOST__CLOUD_NAME=mycloud` sets the `image_host.cloud_name` field.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Hard cap on accepted avatar files (500 KiB), matching the platform UI copy.
pub const MAX_AVATAR_BYTES: usize = 500 * 1024;

/// MIME types accepted for avatar uploads.
pub const ALLOWED_AVATAR_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "SKLSVC_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Image host (avatar CDN) upload settings
    pub image_host: ImageHostConfig,
    /// Document store backend for users, submissions, and notifications
    pub document_store: DocumentStoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            image_host: ImageHostConfig::default(),
            document_store: DocumentStoreConfig::default(),
        }
    }
}

/// Settings for the external image host's unsigned upload API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageHostConfig {
    /// Base URL of the upload API. Overridable so tests can point it at a mock server.
    pub base_url: String,
    /// Cloud identifier interpolated into the upload URL path
    pub cloud_name: String,
    /// Unsigned upload preset sent with every upload
    pub upload_preset: String,
    /// Target folder on the image host
    pub folder: String,
    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloudinary.com".to_string(),
            cloud_name: "dfrtk7d4k".to_string(),
            upload_preset: "skl_app_upload".to_string(),
            folder: "skl_app_avatars".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Document store backend selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentStoreConfig {
    /// External JSON document API
    Http(HttpStoreConfig),
    /// In-process store for development and tests
    Memory,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self::Memory
    }
}

/// Connection settings for the HTTP document store backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpStoreConfig {
    /// Base URL of the document API
    pub base_url: String,
    /// Optional bearer token sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8980".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("SKLSVC_").split("__"))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.image_host.cloud_name.is_empty() {
            return Err(Error::Internal {
                operation: "validate config: image_host.cloud_name cannot be empty".to_string(),
            });
        }

        if self.image_host.upload_preset.is_empty() {
            return Err(Error::Internal {
                operation: "validate config: image_host.upload_preset cannot be empty".to_string(),
            });
        }

        if url::Url::parse(&self.image_host.base_url).is_err() {
            return Err(Error::Internal {
                operation: format!(
                    "validate config: image_host.base_url is not a valid URL: {}",
                    self.image_host.base_url
                ),
            });
        }

        if let DocumentStoreConfig::Http(http) = &self.document_store {
            if url::Url::parse(&http.base_url).is_err() {
                return Err(Error::Internal {
                    operation: format!("validate config: document_store.base_url is not a valid URL: {}", http.base_url),
                });
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request body limit: the avatar size cap plus multipart framing headroom.
    pub fn body_limit(&self) -> usize {
        MAX_AVATAR_BYTES + 64 * 1024
    }
}
