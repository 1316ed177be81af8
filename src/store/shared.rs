use chrono::NaiveDate;
use futures_locks::RwLock;
use serde::Serialize;

use super::{today, Store};
use crate::{
    fetch::{fetch_menus, make_client, Fetched},
    parse::Extraction,
    restaurant::Restaurant,
    snapshot::Snapshot,
};

/// A [`Store`] shared between request handlers and the scheduled refresh job.
#[derive(Debug)]
pub struct SharedStore {
    store: RwLock<Store>,
    client: reqwest::Client,
    restaurants: Vec<Restaurant>,
}

/// What one refresh scraped.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub saved: Option<NaiveDate>,
    pub scraped: Vec<Scraped>,
    pub failed: Vec<FailedFetch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scraped {
    pub restaurant: String,
    pub items: usize,
    /// Menu entries that were dropped because their title had no item number.
    pub malformed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFetch {
    pub restaurant: String,
    pub error: String,
}

impl SharedStore {
    pub fn new(store: Store, restaurants: Vec<Restaurant>) -> Self {
        Self {
            store: RwLock::new(store),
            client: make_client(),
            restaurants,
        }
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub async fn load(&self, date: NaiveDate) -> crate::Result<Option<Snapshot>> {
        self.store.read().await.load(date).await
    }

    /// Today's snapshot, if today's menus were scraped yet.
    pub async fn current(&self) -> crate::Result<Option<Snapshot>> {
        self.load(today()).await
    }

    /// Scrapes every restaurant and stores the menus that could be fetched as today's snapshot.
    /// A restaurant whose fetch failed keeps the menu stored for it earlier today, if any.
    /// Nothing is stored when every fetch failed.
    pub async fn refresh(&self) -> crate::Result<RefreshReport> {
        let start = std::time::Instant::now();
        let fetched = fetch_menus(&self.client, &self.restaurants).await;

        let date = today();
        let mut store = self.store.write().await;
        let earlier = if fetched.iter().any(|f| f.result.is_err()) {
            store.load(date).await.unwrap_or_else(|e| {
                log::warn!("Could not read the stored menus for {date}: {e}");
                None
            })
        } else {
            None
        };

        let mut report = RefreshReport::default();
        let mut snapshot = Snapshot::default();
        for Fetched { restaurant, result } in fetched {
            let restaurant = restaurant.name().to_owned();
            match result {
                Ok(Extraction { menu, malformed }) => {
                    report.scraped.push(Scraped {
                        restaurant: restaurant.clone(),
                        items: menu.len(),
                        malformed: malformed.iter().map(ToString::to_string).collect(),
                    });
                    snapshot.insert(&restaurant, menu);
                }
                Err(e) => {
                    if let Some(menu) = earlier.as_ref().and_then(|s| s.get(&restaurant)) {
                        log::info!("Keeping the menu stored earlier today for {restaurant}");
                        snapshot.insert(&restaurant, menu.clone());
                    }
                    report.failed.push(FailedFetch {
                        restaurant,
                        error: e.to_string(),
                    });
                }
            }
        }

        if report.scraped.is_empty() {
            log::warn!("Every menu fetch failed, keeping the stored snapshot");
            return Ok(report);
        }
        store.save(date, &snapshot).await?;
        report.saved = Some(date);
        log::info!(
            "Refreshed {} of {} menus in {:?}",
            report.scraped.len(),
            self.restaurants.len(),
            start.elapsed()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::{local_restaurant, serve_menu_site};
    use crate::parse::{Menu, MenuItem};

    #[tokio::test]
    async fn test_refresh_keeps_successful_menus() {
        let addr = serve_menu_site().await;
        let shared = SharedStore::new(
            Store::ad_hoc(),
            vec![
                local_restaurant(addr, "Barjan", "/ok"),
                local_restaurant(addr, "Spar", "/broken"),
            ],
        );
        assert!(shared.current().await.unwrap().is_none());

        let report = shared.refresh().await.unwrap();
        assert_eq!(report.saved, Some(today()));
        assert_eq!(report.scraped.len(), 1);
        assert_eq!(report.scraped[0].items, 5);
        assert_eq!(report.scraped[0].malformed.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].restaurant, "Spar");

        let snapshot = shared.current().await.unwrap().unwrap();
        assert_eq!(snapshot.get("Barjan").unwrap().len(), 5);
        assert!(snapshot.get("Spar").is_none());
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_earlier_menu() {
        let addr = serve_menu_site().await;
        let shared = SharedStore::new(
            Store::ad_hoc(),
            vec![
                local_restaurant(addr, "Barjan", "/ok"),
                local_restaurant(addr, "Spar", "/broken"),
            ],
        );
        let burek = Menu::new(vec![MenuItem::new(2, "Burek", vec![], "Malica")]);
        let mut earlier = Snapshot::default();
        earlier.insert("Barjan", Menu::default());
        earlier.insert("Spar", burek.clone());
        shared.store.write().await.save(today(), &earlier).await.unwrap();

        let report = shared.refresh().await.unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.saved, Some(today()));

        let snapshot = shared.current().await.unwrap().unwrap();
        assert_eq!(snapshot.get("Barjan").unwrap().len(), 5);
        assert_eq!(snapshot.get("Spar"), Some(&burek));
    }

    #[tokio::test]
    async fn test_refresh_with_every_fetch_failing_saves_nothing() {
        let addr = serve_menu_site().await;
        let shared = SharedStore::new(
            Store::ad_hoc(),
            vec![local_restaurant(addr, "Spar", "/broken")],
        );
        let report = shared.refresh().await.unwrap();
        assert_eq!(report.saved, None);
        assert!(shared.current().await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_readers() {
        let addr = serve_menu_site().await;
        let shared = SharedStore::new(
            Store::ad_hoc(),
            vec![local_restaurant(addr, "Barjan", "/ok")],
        );
        shared.refresh().await.unwrap();
        // readers run while another refresh holds the lock for writing
        tokio_scoped::scope(|s| {
            let mut scope = s;
            scope.spawn(async {
                shared.refresh().await.unwrap();
            });
            for _ in 0..10 {
                scope = scope.spawn(async {
                    let snapshot = shared.current().await.unwrap().unwrap();
                    assert_eq!(snapshot.get("Barjan").unwrap().len(), 5);
                });
            }
        });
    }
}
