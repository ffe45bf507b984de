use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration, fixed once the sink has started.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host or IP to listen on
    pub host: String,
    /// Port to listen on; 0 picks an ephemeral port
    pub port: u16,
    /// Root directory for the viewer page and its assets
    pub html_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 4953,
            html_root: PathBuf::from("/var/www/html"),
        }
    }
}

impl Config {
    /// Loads configuration from the YAML file named by `FRAMECAST_CONFIG`
    /// (defaults when unset), then applies `FRAMECAST_HOST`,
    /// `FRAMECAST_PORT` and `FRAMECAST_HTML_ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("FRAMECAST_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("parsing config file {}", path))?
            }
            Err(_) => Config::default(),
        };

        if let Ok(host) = std::env::var("FRAMECAST_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = std::env::var("FRAMECAST_PORT") {
            match port.parse() {
                Ok(p) => cfg.port = p,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid FRAMECAST_PORT"),
            }
        }
        if let Ok(root) = std::env::var("FRAMECAST_HTML_ROOT") {
            cfg.html_root = PathBuf::from(root);
        }

        Ok(cfg)
    }
}
