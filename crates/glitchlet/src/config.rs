//! Deployment settings.
//!
//! Loaded with the following precedence, highest first:
//!
//! 1. Environment variables (`GLITCHLET_` prefix, `__` between nested keys)
//! 2. The TOML file given with `--config`, or `./glitchlet.toml` if present
//! 3. Built-in defaults
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [storage]
//! projects_root = "/srv/glitchlet/projects"
//! temp_root = "/srv/glitchlet/tmp"
//!
//! [public]
//! base_url = "https://example.net/projects/"
//! route = "/publish"
//! ```
//!
//! Upload limits and the file type lists are fixed and not part of the
//! settings.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "glitchlet.toml";
pub const ENV_PREFIX: &str = "GLITCHLET_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub public: PublicSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Published projects live directly under this directory.
    pub projects_root: PathBuf,
    /// Spooled uploads and staging directories.
    pub temp_root: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            projects_root: PathBuf::from("./projects"),
            temp_root: std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicSettings {
    /// Prefix of every project URL; the slug and a trailing `/` are appended.
    pub base_url: String,
    /// Path the intake endpoint is mounted on.
    pub route: String,
}

impl Default for PublicSettings {
    fn default() -> Self {
        Self {
            base_url: "https://glitchlet.digitaldavidson.net/projects/".to_string(),
            route: "/publish".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional TOML file and the environment.
    ///
    /// An explicitly given `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?));

        match path {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file '{}' does not exist", path.display());
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        let settings: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true))
            .extract()
            .context("invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.public.route.starts_with('/') {
            bail!("public.route must start with '/', got '{}'", self.public.route);
        }
        if !self.public.base_url.ends_with('/') {
            bail!("public.base_url must end with '/', got '{}'", self.public.base_url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_deployment() {
        let settings = Settings::default();
        assert_eq!(settings.server.bind.to_string(), "127.0.0.1:8080");
        assert_eq!(settings.storage.projects_root, PathBuf::from("./projects"));
        assert_eq!(settings.public.route, "/publish");
        assert!(settings.public.base_url.ends_with("/projects/"));
        settings.validate().unwrap();
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glitchlet.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [public]
            base_url = "https://example.net/p/"
            "#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.server.bind.port(), 9000);
        assert_eq!(settings.public.base_url, "https://example.net/p/");
        // Untouched keys keep their defaults.
        assert_eq!(settings.public.route, "/publish");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn rejects_base_url_without_trailing_slash() {
        let mut settings = Settings::default();
        settings.public.base_url = "https://example.net/p".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_relative_route() {
        let mut settings = Settings::default();
        settings.public.route = "publish".to_string();
        assert!(settings.validate().is_err());
    }
}
