use std::{env, net::SocketAddr, path::PathBuf};

use crate::{error::Error, scheduler::DailyTrigger, store::Store};

const DEFAULT_HISTORY_DIR: &str = "history";

/// Where daily snapshots are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum History {
    Dir(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub history: History,
    pub addr: SocketAddr,
    pub refresh_at: DailyTrigger,
}

impl Config {
    /// Reads `HISTORY_DIR`, `HOST`, `PORT` and `REFRESH_AT`.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let history = match var("HISTORY_DIR").as_deref() {
            Some(":memory:") => History::Memory,
            Some(p) => History::Dir(PathBuf::from(p)),
            None => {
                log::warn!("env var HISTORY_DIR not set, saving menus to ./{DEFAULT_HISTORY_DIR}");
                History::Dir(PathBuf::from(DEFAULT_HISTORY_DIR))
            }
        };
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("PORT").unwrap_or_else(|| "3000".to_string());
        let addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("invalid listen address {host}:{port}: {e}")))?;
        let refresh_at = var("REFRESH_AT")
            .map(|s| s.parse::<DailyTrigger>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            history,
            addr,
            refresh_at,
        })
    }

    pub fn store(&self) -> Store {
        match &self.history {
            History::Dir(dir) => Store::local(dir),
            History::Memory => Store::ad_hoc(),
        }
    }
}
