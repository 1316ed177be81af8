#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod command;
mod config;
mod error;
mod fetch;
mod menu;
mod parse;
mod render;
mod restaurant;
mod scheduler;
mod snapshot;
mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::compression::CompressionLayer;

use crate::{
    command::Command, config::Config, restaurant::Restaurant, scheduler::Scheduler,
    store::SharedStore,
};

pub use error::{Error, Result};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

async fn run_command(store: &SharedStore, name: &str, option: Option<&str>) -> Response {
    let reply = match Command::parse(name, option) {
        Ok(command) => command::execute(&command, store).await,
        Err(e) => Err(e),
    };
    match reply {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            let status = match e {
                Error::Command(_) => StatusCode::BAD_REQUEST,
                Error::UnknownRestaurant(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            };
            log::warn!("Command {name} failed: {e}");
            (status, e.to_string()).into_response()
        }
    }
}

async fn all_menus(State(store): State<Arc<SharedStore>>) -> Response {
    run_command(&store, "menu", None).await
}

async fn restaurant_menu(
    State(store): State<Arc<SharedStore>>,
    Path(choice): Path<String>,
) -> Response {
    run_command(&store, "restaurant", Some(&choice)).await
}

async fn refetch(State(store): State<Arc<SharedStore>>) -> Response {
    run_command(&store, "re-fetch", None).await
}

fn app(store: Arc<SharedStore>) -> Router {
    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET]) // no cross-origin re-fetch
        .allow_origin(Any);

    Router::new()
        .route("/menu", get(all_menus))
        .route("/restaurant/:choice", get(restaurant_menu))
        .route("/re-fetch", put(refetch))
        .with_state(store)
        .layer(cors_layer)
        .layer(compression_layer)
}

/// Refreshes the menus and logs the announcement the chat channel would get.
async fn scheduled_update(store: Arc<SharedStore>) {
    match command::announcement(&store).await {
        Ok(Some(reply)) => log::info!(
            "{} ({} blocks)",
            reply.content.unwrap_or_default(),
            reply.blocks.len()
        ),
        Ok(None) => log::warn!("{}", command::FETCH_FAILED),
        Err(e) => log::error!("Error in scheduled menu update: {e}"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

#[tokio::main]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    log::debug!("{config:?}");
    let store = Arc::new(SharedStore::new(config.store(), Restaurant::defaults()));

    let mut scheduler = Scheduler::default();
    let job_store = Arc::clone(&store);
    scheduler.schedule(config.refresh_at, move || scheduled_update(Arc::clone(&job_store)));
    log::info!("Menus refresh daily at {}", config.refresh_at.time());

    let startup_store = Arc::clone(&store);
    tokio::spawn(async move {
        match startup_store.current().await {
            Ok(Some(_)) => log::info!("Today's menus are already stored"),
            _ => {
                if let Err(e) = startup_store.refresh().await {
                    log::warn!("Startup refresh failed: {e}");
                }
            }
        }
    });

    let addr = config.addr;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to listen on {addr}: {e}"))?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    scheduler.cancel();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::{local_restaurant, serve_menu_site};
    use crate::store::Store;
    use std::net::SocketAddr;

    async fn serve_app() -> SocketAddr {
        let site = serve_menu_site().await;
        let store = Arc::new(SharedStore::new(
            Store::ad_hoc(),
            vec![
                local_restaurant(site, "Barjan", "/ok"),
                local_restaurant(site, "Spar", "/broken"),
            ],
        ));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app(store)).await.unwrap() });
        addr
    }

    #[tokio::test]
    async fn test_routes() {
        let addr = serve_app().await;
        let client = reqwest::Client::new();

        let res = client.get(format!("http://{addr}/menu")).send().await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
        assert_eq!(body["content"], command::NO_MENU_TODAY);

        let res = client
            .put(format!("http://{addr}/re-fetch"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
        assert_eq!(body["blocks"][0]["title"], "Barjan Menu");
        assert_eq!(body["blocks"][0]["fields"][0]["label"], "Juha");

        let res = client
            .get(format!("http://{addr}/restaurant/barjan"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);

        let res = client
            .get(format!("http://{addr}/restaurant/mercator"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
