//! Server configuration
//!
//! Layered with figment: built-in defaults, then `loresheet.toml`, then
//! `LORESHEET_*` environment variables, then command-line flags.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "loresheet.toml";
/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LORESHEET_";
const DEFAULT_PORT: u16 = 3000;
const TOOLTIPS_FILE: &str = "tooltips.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `<name>.json` actor records.
    pub data_dir: PathBuf,
    /// Static front end, served for every path not under `/api`.
    pub public_dir: PathBuf,
    /// Tooltip glossary. Defaults to `tooltips.json` in the public dir.
    #[serde(default)]
    pub tooltips: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            data_dir: PathBuf::from("data"),
            public_dir: PathBuf::from("public"),
            tooltips: None,
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_addr: Option<SocketAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltips: Option<PathBuf>,
}

impl ServerConfig {
    pub fn figment(config_file: &Path, overrides: Overrides) -> Figment {
        Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Resolve every layer into a config. A missing config file is fine.
    pub fn load(config_file: &Path, overrides: Overrides) -> Result<Self, figment::Error> {
        Self::figment(config_file, overrides).extract()
    }

    pub fn tooltips_path(&self) -> PathBuf {
        self.tooltips
            .clone()
            .unwrap_or_else(|| self.public_dir.join(TOOLTIPS_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let cfg = ServerConfig::load(Path::new(CONFIG_FILE), Overrides::default())?;
            assert_eq!(cfg, ServerConfig::default());
            assert_eq!(cfg.bind_addr.port(), 3000);
            Ok(())
        });
    }

    #[test]
    fn layers_apply_in_order() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    data_dir = "from-file"
                    public_dir = "www"
                "#,
            )?;
            jail.set_env("LORESHEET_DATA_DIR", "from-env");

            let cfg = ServerConfig::load(Path::new(CONFIG_FILE), Overrides::default())?;
            assert_eq!(cfg.data_dir, PathBuf::from("from-env"));
            assert_eq!(cfg.public_dir, PathBuf::from("www"));
            assert_eq!(cfg.tooltips_path(), PathBuf::from("www/tooltips.json"));

            let overrides = Overrides {
                data_dir: Some(PathBuf::from("from-cli")),
                ..Overrides::default()
            };
            let cfg = ServerConfig::load(Path::new(CONFIG_FILE), overrides)?;
            assert_eq!(cfg.data_dir, PathBuf::from("from-cli"));
            Ok(())
        });
    }
}
