use std::{num::NonZeroU32, sync::OnceLock, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};

use crate::parse::{Extraction, Menu};
use crate::restaurant::Restaurant;

static REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn make_client() -> reqwest::Client {
    Client::builder()
        .gzip(true)
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .expect("client creation should succeed")
}

static RATE_LIMIT: u32 = 5;
static DELAY_JITTER: Duration = Duration::from_millis(500);
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

#[instrument(skip(client, restaurant), fields(
    restaurant = %restaurant.name(),
    url = %restaurant.url(),
), level = Level::TRACE)]
pub async fn fetch_menu_page(
    client: &reqwest::Client,
    restaurant: &Restaurant,
) -> Result<String, RequestError> {
    let rate_limiter = RATE_LIMITER.get_or_init(|| {
        governor::RateLimiter::direct(governor::Quota::per_second(
            NonZeroU32::new(RATE_LIMIT).unwrap_or(NonZeroU32::MIN),
        ))
    });
    let retry_jitter = governor::Jitter::new(Duration::ZERO, DELAY_JITTER);
    rate_limiter.until_ready_with_jitter(retry_jitter).await;

    let res = client
        .get(restaurant.url().clone())
        .send()
        .await?
        .error_for_status()?;
    let start = std::time::Instant::now();
    let text = res.text().await?;
    log::trace!(
        "Got text of {} menu page in \t {:?}",
        restaurant.name(),
        start.elapsed()
    );
    Ok(text)
}

/// The outcome of scraping one restaurant.
#[derive(Debug)]
pub struct Fetched<'a> {
    pub restaurant: &'a Restaurant,
    pub result: Result<Extraction, RequestError>,
}

/// Scrapes every restaurant concurrently. A failed fetch only fails its own entry; the result
/// holds one entry per restaurant, in the order given.
pub async fn fetch_menus<'a>(
    client: &reqwest::Client,
    restaurants: &'a [Restaurant],
) -> Vec<Fetched<'a>> {
    futures::future::join_all(restaurants.iter().map(|restaurant| async move {
        let result = fetch_menu_page(client, restaurant)
            .await
            .map(|html| Menu::from_html(&html));
        if let Err(e) = &result {
            log::warn!("Fetching the {} menu failed: {e}", restaurant.name());
        }
        Fetched { restaurant, result }
    }))
    .await
}
