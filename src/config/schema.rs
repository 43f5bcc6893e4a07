//! Config schema and deserialization

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
/// 64 KiB is far more than an 18-answer questionnaire needs
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Root config structure for .posturerc.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Address the server binds to. Default: 0.0.0.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port the server listens on. Default: 3000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Directory served for every GET path other than /health.
    /// A relative path is resolved against the directory of the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<String>,

    /// Request bodies above this size are rejected with 413
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,

    /// Minimum overall score for `posture` (exit 1 if below)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_under: Option<f64>,
}

impl Config {
    /// The config written by `posture init`
    pub fn starter(port: u16) -> Self {
        Self {
            extends: None,
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(port),
            static_dir: Some(DEFAULT_STATIC_DIR.to_string()),
            max_body_bytes: Some(DEFAULT_MAX_BODY_BYTES),
            fail_under: None,
        }
    }

    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_fail_under: Option<f64>) -> Self {
        if cli_fail_under.is_some() {
            self.fail_under = cli_fail_under;
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.host.is_none() {
            self.host = base.host;
        }
        if self.port.is_none() {
            self.port = base.port;
        }
        if self.static_dir.is_none() {
            self.static_dir = base.static_dir;
        }
        if self.max_body_bytes.is_none() {
            self.max_body_bytes = base.max_body_bytes;
        }
        if self.fail_under.is_none() {
            self.fail_under = base.fail_under;
        }
    }

    /// Make relative paths in this config relative to `config_dir`
    pub fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(dir) = self.static_dir.as_mut() {
            if Path::new(dir.as_str()).is_relative() {
                *dir = config_dir.join(dir.as_str()).to_string_lossy().into_owned();
            }
        }
    }

    /// Resolve server settings.
    ///
    /// Precedence per field: CLI flag, then `PORT` (port only), then this
    /// config, then the built-in default.
    pub fn server_settings(&self, cli: ServerOverrides, env_port: Option<u16>) -> ServerSettings {
        ServerSettings {
            host: cli
                .host
                .or_else(|| self.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(env_port).or(self.port).unwrap_or(DEFAULT_PORT),
            static_dir: cli
                .static_dir
                .or_else(|| self.static_dir.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            max_body_bytes: self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }
}

/// Server values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl ServerSettings {
    /// `host:port` in a form `TcpListener::bind` accepts
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_address().parse().ok()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Config::default().server_settings(ServerOverrides::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ServerSettings::default();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.static_dir, PathBuf::from("public"));
        assert_eq!(settings.max_body_bytes, 65536);
    }

    #[test]
    fn test_precedence_cli_env_file() {
        let config = Config {
            port: Some(4000),
            host: Some("127.0.0.1".to_string()),
            ..Config::default()
        };

        assert_eq!(config.server_settings(ServerOverrides::default(), None).port, 4000);
        assert_eq!(
            config.server_settings(ServerOverrides::default(), Some(5000)).port,
            5000
        );
        let cli = ServerOverrides {
            port: Some(6000),
            ..ServerOverrides::default()
        };
        let settings = config.server_settings(cli, Some(5000));
        assert_eq!(settings.port, 6000);
        assert_eq!(settings.host, "127.0.0.1");
    }

    #[test]
    fn test_camel_case_keys() {
        let config: Config = serde_json::from_str(
            r#"{ "staticDir": "web", "maxBodyBytes": 1024, "failUnder": 2.5 }"#,
        )
        .unwrap();
        assert_eq!(config.static_dir.as_deref(), Some("web"));
        assert_eq!(config.max_body_bytes, Some(1024));
        assert_eq!(config.fail_under, Some(2.5));
    }

    #[test]
    fn test_resolve_paths_relative_static_dir() {
        let mut config = Config {
            static_dir: Some("web".to_string()),
            ..Config::default()
        };
        config.resolve_paths(Path::new("/srv/posture"));
        assert_eq!(
            config.server_settings(ServerOverrides::default(), None).static_dir,
            Path::new("/srv/posture").join("web")
        );
    }

    #[test]
    fn test_resolve_paths_keeps_absolute_and_unset() {
        let absolute = std::env::temp_dir().join("site");
        let mut config = Config {
            static_dir: Some(absolute.to_string_lossy().into_owned()),
            ..Config::default()
        };
        config.resolve_paths(Path::new("/srv/posture"));
        assert_eq!(config.static_dir.as_deref().map(PathBuf::from), Some(absolute));

        let mut config = Config::default();
        config.resolve_paths(Path::new("/srv/posture"));
        assert_eq!(config.static_dir, None);
        assert_eq!(
            config.server_settings(ServerOverrides::default(), None).static_dir,
            PathBuf::from("public")
        );
    }

    #[test]
    fn test_merge_with_cli() {
        let config = Config {
            fail_under: Some(2.0),
            ..Config::default()
        };
        assert_eq!(config.clone().merge_with_cli(None).fail_under, Some(2.0));
        assert_eq!(config.merge_with_cli(Some(3.0)).fail_under, Some(3.0));
    }

    #[test]
    fn test_bind_address() {
        let mut settings = ServerSettings::default();
        assert_eq!(settings.bind_address(), "0.0.0.0:3000");
        assert!(settings.socket_addr().is_some());
        settings.host = "::1".to_string();
        assert_eq!(settings.bind_address(), "[::1]:3000");
        assert!(settings.socket_addr().is_some());
    }

    #[test]
    fn test_starter_serializes_without_empty_keys() {
        let json = serde_json::to_string(&Config::starter(8080)).unwrap();
        assert!(json.contains("\"port\":8080"));
        assert!(json.contains("\"staticDir\":\"public\""));
        assert!(!json.contains("extends"));
        assert!(!json.contains("failUnder"));
    }
}
