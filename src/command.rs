use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    error::Error,
    menu::GroupedMenu,
    render::{chunk, DisplayBlock},
    restaurant::Restaurant,
    snapshot::Snapshot,
    store::{today, SharedStore},
};

pub const NO_MENU_TODAY: &str = "No menu available for today. Try using /re-fetch first.";
pub const FETCH_FAILED: &str = "Failed to fetch the menu.";
pub const MENU_UPDATED: &str = "Menu updated!";
pub const TODAYS_MENU: &str = "🍽️ Today's Menu:";

/// The commands users can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape every restaurant again, then show all menus.
    Refetch,
    /// Show every restaurant's menu for today.
    Menu,
    /// Show one restaurant's menu, chosen by id or name.
    Restaurant(String),
}

impl Command {
    pub fn parse(name: &str, option: Option<&str>) -> crate::Result<Self> {
        match (name, option) {
            ("re-fetch", _) => Ok(Self::Refetch),
            ("menu", _) => Ok(Self::Menu),
            ("restaurant", Some(choice)) => Ok(Self::Restaurant(choice.to_owned())),
            ("restaurant", None) => Err(Error::Command(
                "the restaurant command needs a restaurant".to_owned(),
            )),
            (other, _) => Err(Error::Command(format!("unknown command {other:?}"))),
        }
    }
}

/// What gets sent back: an optional text line and the menu blocks, in display order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub content: Option<String>,
    pub blocks: Vec<DisplayBlock>,
}

impl Reply {
    pub fn text(content: &str) -> Self {
        Self {
            content: Some(content.to_owned()),
            blocks: Vec::new(),
        }
    }
}

/// Display blocks for one restaurant, stamped with the snapshot's `date`, or `None` when the
/// snapshot has nothing to show for it.
pub fn menu_blocks(
    restaurant: &Restaurant,
    snapshot: &Snapshot,
    date: NaiveDate,
) -> Option<Vec<DisplayBlock>> {
    let menu = snapshot.get(restaurant.name())?;
    let grouped = GroupedMenu::group(menu);
    log::debug!(
        "{}: {} items in {} categories",
        restaurant.name(),
        grouped.item_count(),
        grouped.len()
    );
    let blocks: Vec<_> = chunk(&restaurant.title(), Some(restaurant.url()), &grouped)
        .into_iter()
        .map(|block| block.dated(date))
        .collect();
    (!blocks.is_empty()).then_some(blocks)
}

fn render<'a>(
    restaurants: impl IntoIterator<Item = &'a Restaurant>,
    snapshot: &Snapshot,
    date: NaiveDate,
    heading: Option<&str>,
) -> Reply {
    let mut lines: Vec<String> = heading.into_iter().map(str::to_owned).collect();
    let mut blocks = Vec::new();
    for restaurant in restaurants {
        match menu_blocks(restaurant, snapshot, date) {
            Some(b) => blocks.extend(b),
            None => lines.push(format!("No menu available for {}.", restaurant.name())),
        }
    }
    Reply {
        content: (!lines.is_empty()).then(|| lines.join("\n")),
        blocks,
    }
}

pub async fn execute(command: &Command, store: &SharedStore) -> crate::Result<Reply> {
    log::debug!("Executing {command:?}");
    let date = today();
    match command {
        Command::Menu => Ok(match store.load(date).await? {
            Some(snapshot) => render(store.restaurants(), &snapshot, date, None),
            None => Reply::text(NO_MENU_TODAY),
        }),
        Command::Restaurant(choice) => {
            let restaurant = Restaurant::find(store.restaurants(), choice)
                .ok_or_else(|| Error::UnknownRestaurant(choice.clone()))?;
            Ok(match store.load(date).await? {
                Some(snapshot) => render([restaurant], &snapshot, date, None),
                None => Reply::text(NO_MENU_TODAY),
            })
        }
        Command::Refetch => {
            let report = store.refresh().await?;
            for scraped in &report.scraped {
                log::info!(
                    "{}: {} items, {} malformed entries skipped",
                    scraped.restaurant,
                    scraped.items,
                    scraped.malformed.len()
                );
            }
            for failed in &report.failed {
                log::warn!("{} menu not refreshed: {}", failed.restaurant, failed.error);
            }
            Ok(match store.load(date).await? {
                Some(snapshot) => {
                    render(store.restaurants(), &snapshot, date, Some(MENU_UPDATED))
                }
                None => Reply::text(FETCH_FAILED),
            })
        }
    }
}

/// The reply posted after the scheduled refresh, or `None` when there is no menu for today.
pub async fn announcement(store: &SharedStore) -> crate::Result<Option<Reply>> {
    store.refresh().await?;
    let date = today();
    Ok(store
        .load(date)
        .await?
        .map(|snapshot| render(store.restaurants(), &snapshot, date, Some(TODAYS_MENU))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::{local_restaurant, serve_menu_site};
    use crate::store::Store;

    async fn store() -> SharedStore {
        let addr = serve_menu_site().await;
        SharedStore::new(
            Store::ad_hoc(),
            vec![
                local_restaurant(addr, "Barjan", "/ok"),
                local_restaurant(addr, "Spar", "/broken"),
            ],
        )
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("menu", None).unwrap(), Command::Menu);
        assert_eq!(Command::parse("re-fetch", None).unwrap(), Command::Refetch);
        assert_eq!(
            Command::parse("restaurant", Some("spar")).unwrap(),
            Command::Restaurant("spar".into())
        );
        assert!(matches!(
            Command::parse("restaurant", None),
            Err(Error::Command(_))
        ));
        assert!(matches!(
            Command::parse("dessert", None),
            Err(Error::Command(_))
        ));
    }

    #[tokio::test]
    async fn test_menu_before_any_fetch() {
        let store = store().await;
        let reply = execute(&Command::Menu, &store).await.unwrap();
        assert_eq!(reply, Reply::text(NO_MENU_TODAY));
        let reply = execute(&Command::Restaurant("barjan".into()), &store)
            .await
            .unwrap();
        assert_eq!(reply, Reply::text(NO_MENU_TODAY));
    }

    #[tokio::test]
    async fn test_refetch_then_menu() {
        let store = store().await;
        let reply = execute(&Command::Refetch, &store).await.unwrap();
        assert_eq!(
            reply.content.as_deref(),
            Some("Menu updated!\nNo menu available for Spar.")
        );
        assert_eq!(reply.blocks.len(), 1);
        let block = &reply.blocks[0];
        assert_eq!(block.title, "Barjan Menu");
        assert_eq!(block.url.as_ref(), Some(store.restaurants()[0].url()));
        assert_eq!(block.timestamp, Some(today()));
        assert_eq!(block.color, 0x0099ff);
        let labels: Vec<_> = block.fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Juha", "Meso", "Other"]);

        let menu = execute(&Command::Menu, &store).await.unwrap();
        assert_eq!(menu.blocks, reply.blocks);
    }

    #[tokio::test]
    async fn test_restaurant() {
        let store = store().await;
        execute(&Command::Refetch, &store).await.unwrap();

        let reply = execute(&Command::Restaurant("Barjan".into()), &store)
            .await
            .unwrap();
        assert_eq!(reply.content, None);
        assert_eq!(reply.blocks.len(), 1);

        let reply = execute(&Command::Restaurant("spar".into()), &store)
            .await
            .unwrap();
        assert_eq!(reply.content.as_deref(), Some("No menu available for Spar."));
        assert!(reply.blocks.is_empty());

        let err = execute(&Command::Restaurant("mercator".into()), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRestaurant(c) if c == "mercator"));
    }

    #[tokio::test]
    async fn test_announcement() {
        let store = store().await;
        let reply = announcement(&store).await.unwrap().unwrap();
        assert!(reply.content.unwrap().starts_with(TODAYS_MENU));
        assert_eq!(reply.blocks.len(), 1);
    }
}
