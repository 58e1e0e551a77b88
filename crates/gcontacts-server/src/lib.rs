//! HTTP service for contact operations.
//!
//! Routes, relative to the configured prefix:
//!
//! | method | path      | body                                   | response                         |
//! |--------|-----------|----------------------------------------|----------------------------------|
//! | GET    | `/test`   |                                        | `{"message": "API is working!"}` |
//! | POST   | `/create` | contact fields                         | `{"resource_name": "people/.."}` |
//! | PUT    | `/edit`   | `resource_name` + contact fields       | `{"success": true}`              |
//! | DELETE | `/delete` | `resource_name`                        | `{"success": true}`              |
//!
//! Every call loads the token file from the configured path and refreshes it
//! if needed before talking to the People API.
//!
//! # Example
//!
//! ```rust,no_run
//! use gcontacts_providers::google::GoogleConfig;
//! use gcontacts_server::{AppState, ServerConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::from_config(GoogleConfig::new("token.json"))?;
//!     serve(ServerConfig::default().with_route_prefix("/raman"), state).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod signals;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{ServerConfig, normalize_prefix};
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::{
    AppState, ContactRequest, CreateResponse, DeleteRequest, EditRequest, MessageResponse,
    SuccessResponse,
};
pub use signals::shutdown_signal;

/// Builds the router, mounted under `prefix` when it is not empty.
pub fn router(state: AppState, prefix: &str) -> Router {
    let routes = Router::new()
        .route("/test", get(handler::test))
        .route("/create", post(handler::create))
        .route("/edit", put(handler::edit))
        .route("/delete", delete(handler::delete))
        .with_state(state);

    let prefix = normalize_prefix(prefix);
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&prefix, routes)
    };

    app.layer(TraceLayer::new_for_http())
}

/// Binds `config.bind` and serves until SIGINT or SIGTERM.
pub async fn serve(config: ServerConfig, state: AppState) -> ServerResult<()> {
    let listener = TcpListener::bind(config.bind).await?;
    let addr = listener.local_addr()?;
    info!(%addr, prefix = %config.route_prefix, "listening");

    let app = router(state, &config.route_prefix);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}
