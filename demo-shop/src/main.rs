//! Demo shop
//!
//! Renders a product page "on the server", ships the store state as JSON,
//! hydrates a client from it and navigates through the shop.

mod app;

use app::*;
use route_lifecycle::{
    AppHandle, ClientIntegration, EntryKind, InstantTiming, MemoryStore, ServerIntegration, Store, Timing,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("info,route_lifecycle=debug")
        .init();

    // Server render
    let server_store = Arc::new(MemoryStore::new());
    let server = ServerIntegration::new(Arc::new(create_router()), server_store.clone())
        .app(AppHandle::new(ShopContext::new(server_store.clone())))
        .fetch_options(fetch_options());

    let initial = product(1);
    match server.prepare(initial.clone(), json!({"url": initial.full_path()})).await {
        Ok(None) => {}
        Ok(Some(directive)) => {
            info!(?directive, "server render redirected");
            return Ok(());
        }
        Err(rejection) => return Err(rejection.into_error().into()),
    }
    let payload = serde_json::to_string(&server_store.state())?;
    info!(bytes = payload.len(), "server state serialized");

    // Client
    let client_store = Arc::new(MemoryStore::with_state(serde_json::from_str(&payload)?));
    let timing = Arc::new(InstantTiming::new());
    let router = Arc::new(create_router());
    let client = ClientIntegration::builder(router.clone(), client_store.clone())
        .app(AppHandle::new(ShopContext::new(client_store.clone()).signed_in("ada")))
        .timing(timing.clone())
        .fetch_options(fetch_options())
        .install();

    router.replace_current(initial.clone());
    let hydrated = client.hydrate(&initial)?;
    info!(modules = hydrated, "client hydrated");

    for to in [
        cart(),
        cart().with_query("coupon", "SPRING"),
        product(2),
        checkout(),
        home(),
    ] {
        let target = to.full_path();
        match router.navigate(to).await {
            Ok(result) => info!(to = %target, ?result, "navigation finished"),
            Err(err) => info!(to = %target, %err, "navigation cancelled"),
        }
    }

    for entry in timing.entries_by_type(EntryKind::Measure) {
        info!(name = %entry.name, duration_ms = entry.duration, "measure");
    }
    info!(pending = ?client.lifecycle().pending_removals(), "removal queue");
    println!("{}", serde_json::to_string_pretty(&client_store.state())?);
    Ok(())
}
