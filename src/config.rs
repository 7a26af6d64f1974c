use std::path::PathBuf;

use anyhow::Context;

use crate::cli::Cli;

/// Default data root on the NCI filesystem, overridable via AUSREFDIR.
const DEFAULT_ROOT: &str = "/g/data/ia39/aus-ref-clim-data-nci";

/// Base path for per-file GETs on the RDA server.
pub const RDA_BASE_URL: &str = "https://rda.ucar.edu/data/ds502.2/";

/// Fixed form-login endpoint on the RDA server.
pub const RDA_LOGIN_URL: &str = "https://rda.ucar.edu/cgi-bin/login";

/// Application configuration, merged from the CLI and the environment.
///
/// The endpoints are fields rather than constants at the use sites so tests
/// can point a config at a local server.
pub struct Config {
    pub year: String,
    pub months: Vec<String>,
    pub username: String,
    pub password: String,
    /// Operating user for log attribution, from USER.
    pub operator: String,
    pub data_dir: PathBuf,
    pub log_path: PathBuf,
    pub base_url: String,
    pub login_url: String,
    pub debug: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("year", &self.year)
            .field("months", &self.months)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("data_dir", &self.data_dir)
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let password = std::env::var("RDAPSWD")
            .context("RDAPSWD environment variable must hold the RDA account password")?;

        let root = std::env::var("AUSREFDIR")
            .map(|r| expand_tilde(&r))
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ROOT));

        let operator = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());

        let months = if cli.months.is_empty() {
            (1..=12).map(|m| format!("{:02}", m)).collect()
        } else {
            cli.months
        };

        Ok(Self {
            year: cli.year,
            months,
            username: cli.user,
            password,
            operator,
            data_dir: root.join("cmorph").join("data"),
            log_path: root.join("cmorph").join("code").join("update_log.txt"),
            base_url: RDA_BASE_URL.to_string(),
            login_url: RDA_LOGIN_URL.to_string(),
            debug: cli.debug,
        })
    }
}
