mod local;
mod shared;

use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::snapshot::Snapshot;

use local::FileStore;
pub use shared::SharedStore;

/// The calendar day snapshots are keyed by.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug)]
#[non_exhaustive]
pub enum Store {
    Local(FileStore),
    /// Keeps only the latest snapshot, in memory.
    AdHoc(Option<(NaiveDate, Snapshot)>),
}

impl Store {
    #[inline]
    pub fn local(p: impl AsRef<Path>) -> Self {
        Self::Local(FileStore::open(p))
    }

    #[inline]
    pub const fn ad_hoc() -> Self {
        Self::AdHoc(None)
    }

    pub async fn load(&self, date: NaiveDate) -> crate::Result<Option<Snapshot>> {
        match self {
            Self::Local(f) => f.load(date).await,
            Self::AdHoc(latest) => Ok(latest
                .as_ref()
                .filter(|(day, _)| *day == date)
                .map(|(_, snapshot)| snapshot.clone())),
        }
    }

    /// Replaces whatever was stored for `date`.
    pub async fn save(&mut self, date: NaiveDate, data: &Snapshot) -> crate::Result<()> {
        match self {
            Self::Local(f) => f.save(date, data).await,
            Self::AdHoc(latest) => {
                *latest = Some((date, data.clone()));
                Ok(())
            }
        }
    }
}
