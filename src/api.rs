use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use derive_new::new;
use snafu::ResultExt as _;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::database::{Database, Record};
use crate::error::{ApplicationError, BindAddressSnafu, ConnectDatabaseSnafu, WebServerSnafu};
use crate::model::Video;

pub mod comments;
pub mod error;
pub mod likes;
pub mod videos;

#[cfg(test)]
mod tests;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Debug, Clone, new)]
pub struct App {
    pub database: Database,
    pub authenticator: Arc<Authenticator>,
}

/// The API routes, without the `/api` prefix.
pub fn router(app: App) -> Router {
    Router::new()
        .route(
            "/like",
            get(likes::status).post(likes::like).delete(likes::unlike),
        )
        .route(
            "/comment",
            get(comments::list)
                .post(comments::create)
                .delete(comments::delete),
        )
        .route("/video", post(videos::publish))
        .route("/videos", get(videos::feed).post(videos::publish))
        .route("/videos/:id", get(videos::get))
        .route("/videos/:id/recount", post(videos::recount))
        .with_state(app)
}

/// Connects to the database and serves the API under `/api` until Ctrl+C.
pub async fn serve(config: &Config) -> Result<(), ApplicationError> {
    let database = Database::connect(&config.database)
        .await
        .context(ConnectDatabaseSnafu)?;
    let authenticator = Authenticator::from_config(&config.session);
    let app = App::new(database, Arc::new(authenticator));

    let service = Router::new().nest("/api", router(app)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = TcpListener::bind(config.host_address)
        .await
        .context(BindAddressSnafu {
            address: config.host_address,
        })?;
    tracing::info!(address = %config.host_address, "listening");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(WebServerSnafu)?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
        Err(error) => {
            tracing::error!(%error, "cannot listen for Ctrl+C, serving until killed");
            std::future::pending::<()>().await
        }
    }
}

/// Reads a video id sent by a client, which may be missing or blank.
fn require_video(video_id: Option<&str>) -> Result<Record<Video>, ApiError> {
    video_id
        .and_then(Record::parse)
        .ok_or_else(|| ApiError::bad_request("Missing videoId"))
}
