//! Shop pages
//!
//! Define the route components here and register them in `create_router()`.

use super::*;
use route_lifecycle::{
    Component, FetchContext, FetchOptions, FetchOutcome, MemoryRouter, ModuleDeclaration,
    ModuleDefinition, ModuleName, ModulePath, ModuleState, NavResult, NavigationDirective,
    NavigationError, Rejection, Route, RouteComponent, UpdatePolicy,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// Routes
// =============================================================================

pub fn home() -> Route {
    Route::new("/").named("home")
}

pub fn product(id: u32) -> Route {
    Route::new(format!("/products/{id}"))
        .named("product")
        .with_param("id", id.to_string())
}

pub fn cart() -> Route {
    Route::new("/cart").named("cart")
}

pub fn checkout() -> Route {
    Route::new("/checkout").named("checkout")
}

/// Create the application router
pub fn create_router() -> MemoryRouter {
    let layout = layout_page();
    MemoryRouter::new()
        .route("home", vec![layout.clone(), home_page()])
        .route("product", vec![layout.clone(), product_page()])
        .route("cart", vec![layout.clone(), cart_page()])
        .route("checkout", vec![layout, checkout_page()])
}

/// Pipeline shared by server and client
pub fn fetch_options() -> FetchOptions {
    FetchOptions::new()
        .middleware(log_navigation)
        .global_fetch_data(load_session)
        .post_middleware(data_ready)
}

// =============================================================================
// Helpers
// =============================================================================

fn shop(ctx: &FetchContext) -> Result<&ShopContext, Rejection> {
    ctx.app
        .downcast_ref::<ShopContext>()
        .ok_or_else(|| NavigationError::internal("shop context missing").into())
}

fn write_state(shop: &ShopContext, path: &str, value: impl Serialize) -> Result<(), Rejection> {
    let value = serde_json::to_value(value).map_err(NavigationError::from)?;
    shop.store.set_state(&ModulePath::parse(path), value)?;
    Ok(())
}

fn product_id(route: &Route) -> NavResult<u32> {
    route
        .params
        .get("id")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| {
            NavigationError::module_resolution(format!("bad product id in {}", route.path))
        })
}

fn module(name: impl Into<ModuleName>, state: serde_json::Value) -> ModuleDeclaration {
    ModuleDeclaration::new(name, ModuleDefinition::new(ModuleState(state)))
}

// =============================================================================
// Middleware
// =============================================================================

async fn log_navigation(ctx: FetchContext) -> Result<(), Rejection> {
    tracing::info!(
        from = %ctx.from.full_path(),
        to = %ctx.route.full_path(),
        server = ctx.is_server(),
        "resolving route data"
    );
    Ok(())
}

async fn data_ready(ctx: FetchContext) -> Result<(), Rejection> {
    tracing::debug!(to = %ctx.route.full_path(), "route data ready");
    Ok(())
}

/// Publishes the session and keeps signed-out users away from checkout.
async fn load_session(ctx: FetchContext) -> FetchOutcome {
    let shop = shop(&ctx)?;
    write_state(shop, "session", SessionState { user: shop.user.clone() })?;

    if ctx.route.name.as_deref() == Some("checkout") && shop.user.is_none() {
        return Ok(Some(NavigationDirective::redirect("/login")));
    }
    Ok(None)
}

// =============================================================================
// Pages
// =============================================================================

fn layout_page() -> Arc<dyn RouteComponent> {
    Arc::new(Component::new("Layout").store_module(module("session", json!({}))))
}

fn home_page() -> Arc<dyn RouteComponent> {
    Arc::new(
        Component::new("HomePage")
            .store_module(module("home", json!({"products": []})))
            .fetch_data(|ctx| async move {
                let shop = shop(&ctx)?;
                write_state(shop, "home", json!({"products": shop.catalog.list_products()}))?;
                Ok(None)
            }),
    )
}

fn product_page() -> Arc<dyn RouteComponent> {
    Arc::new(
        Component::new("ProductPage")
            .store_module(module("catalog", json!({})))
            .store_module(module(
                ModuleName::from_fn(|route| Ok(format!("catalog/{}", product_id(route)?))),
                json!({"product": null}),
            ))
            .fetch_data(|ctx| async move {
                let shop = shop(&ctx)?;
                let id = product_id(&ctx.route)?;
                let Some(product) = shop.catalog.get_product(id) else {
                    return Ok(Some(NavigationDirective::redirect("/")));
                };
                write_state(
                    shop,
                    &format!("catalog/{id}"),
                    ProductState {
                        product: Some(product),
                    },
                )?;
                Ok(None)
            }),
    )
}

fn cart_page() -> Arc<dyn RouteComponent> {
    Arc::new(
        Component::new("CartPage")
            .store_module(module("cart", json!({"items": []})))
            // Coupons travel in the query string.
            .update_policy(UpdatePolicy::fields().query(true))
            .fetch_data(|ctx| async move {
                let shop = shop(&ctx)?;
                write_state(
                    shop,
                    "cart",
                    CartState {
                        items: shop.catalog.cart_items(),
                    },
                )?;
                Ok(None)
            }),
    )
}

fn checkout_page() -> Arc<dyn RouteComponent> {
    Arc::new(Component::new("CheckoutPage").store_module(module("checkout", json!({"step": 1}))))
}
