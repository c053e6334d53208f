//! Route configuration.

use axum::Router;
use axum::routing::{get, post};

use super::handlers;
use super::state::AppState;
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// Create the application router.
pub fn create_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let system_routes = Router::new().route("/health", get(handlers::health));

    let entry_routes = routes!(D => {
        get "/" => handlers::show_entries,
        post "/add" => handlers::add_entry,
        get "/filter" => handlers::filter_entries,
        post "/delete" => handlers::delete_entry,
        post "/edit" => handlers::edit_entry,
        post "/edit-success" => handlers::update_entry,
    });

    system_routes.merge(entry_routes).with_state(state)
}
