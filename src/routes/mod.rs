use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod clients;
pub mod doc;
pub mod employees;
pub mod health;
pub mod params;
pub mod profile;
pub mod quotes;
pub mod sites;
pub mod stock;
pub mod timesheet;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/stock", stock::router())
        .nest("/quotes", quotes::router())
        .nest("/timesheet", timesheet::router())
        .nest("/sites", sites::router())
        .nest("/cranes", sites::crane_router())
        .nest("/logbook", sites::logbook_router())
        .nest("/profile", profile::router())
        .nest("/employees", employees::router())
        .nest("/clients", clients::router())
}
