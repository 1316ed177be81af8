use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::snapshot::Snapshot;

/// One pretty-printed json file per day inside a history directory.
#[derive(Debug)]
pub struct FileStore(PathBuf);

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self(dir.as_ref().to_owned())
    }

    /// `menu-19.10.2026.json`; day and month are not zero padded.
    pub fn file_name(date: NaiveDate) -> String {
        format!("menu-{}.{}.{}.json", date.day(), date.month(), date.year())
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.0.join(Self::file_name(date))
    }

    pub async fn load(&self, date: NaiveDate) -> crate::Result<Option<Snapshot>> {
        let path = self.path_for(date);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).await?;
        serde_json::from_str(&text).map(Some).map_err(From::from)
    }

    pub async fn save(&self, date: NaiveDate, value: &Snapshot) -> crate::Result<()> {
        fs::create_dir_all(&self.0).await?;
        let text = serde_json::to_string_pretty(value)?;
        let path = self.path_for(date);
        fs::write(&path, text).await?;
        log::info!("Saved menu snapshot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parse::{Menu, MenuItem};

    pub(crate) fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("menu_bot-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(FileStore::file_name(date), "menu-7.3.2026.json");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = temp_dir("file-store");
        let store = FileStore::open(&dir);
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(store.load(date).await.unwrap().is_none());

        let mut snapshot = Snapshot::default();
        snapshot.insert(
            "Barjan",
            Menu::new(vec![MenuItem::new(1, "Goveja juha", vec![], "Juha")]),
        );
        store.save(date, &snapshot).await.unwrap();
        assert!(dir.join("menu-19.10.2026.json").exists());
        assert_eq!(store.load(date).await.unwrap(), Some(snapshot));

        // other days are untouched
        let next = date.succ_opt().unwrap();
        assert!(store.load(next).await.unwrap().is_none());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = temp_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        std::fs::write(dir.join(FileStore::file_name(date)), "not json").unwrap();
        let store = FileStore::open(&dir);
        assert!(matches!(
            store.load(date).await,
            Err(crate::error::Error::Json(_))
        ));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
