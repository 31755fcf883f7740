use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header::ACCEPT},
    response::{IntoResponse, Response},
    routing::get,
};
use log::{error, info};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::{FailureResponse, NotFoundError, RepositoryAggregator, RepositoryResponse, StdResult};

/// Errors returned by the HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The requested user does not exist upstream.
    #[error("{0}")]
    NotFound(NotFoundError),

    /// The client does not accept a JSON representation.
    #[error("Could not find acceptable representation")]
    NotAcceptable,

    /// Any other failure.
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<NotFoundError>() {
            Ok(not_found) => ApiError::NotFound(not_found),
            Err(error) => ApiError::Internal(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!("Request failed: {e:?}");
        }
        let status = self.status();
        let failure = FailureResponse::new(status.as_u16(), &self.to_string());

        (status, Json(failure)).into_response()
    }
}

/// Returns `true` when the `Accept` headers allow a JSON response.
///
/// A request without any `Accept` header accepts everything.
fn accepts_json(headers: &HeaderMap) -> bool {
    let mut values = headers.get_all(ACCEPT).into_iter().peekable();
    if values.peek().is_none() {
        return true;
    }

    values
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|media_range| {
            media_range
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
        .any(|media_type| {
            matches!(
                media_type.as_str(),
                "application/json" | "application/*" | "*/*"
            )
        })
}

async fn repositories_handler(
    Extension(aggregator): Extension<Arc<dyn RepositoryAggregator>>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<RepositoryResponse>>, ApiError> {
    if !accepts_json(&headers) {
        return Err(ApiError::NotAcceptable);
    }
    info!("Retrieving repositories of user {username}");
    let repositories = aggregator.get_repositories(&username).await?;

    Ok(Json(repositories.iter().map(Into::into).collect()))
}

async fn health_handler() -> StatusCode {
    info!("HEALTH CHECK TRIGGERED");

    StatusCode::OK
}

/// Builds the router of the HTTP API.
pub fn router(aggregator: Arc<dyn RepositoryAggregator>) -> Router {
    Router::new()
        .route("/api/v1/repositories/:username", get(repositories_handler))
        .route("/health", get(health_handler))
        .layer(Extension(aggregator))
}

/// Serves the HTTP API on the given listener until the process is stopped.
pub async fn serve(
    listener: TcpListener,
    aggregator: Arc<dyn RepositoryAggregator>,
) -> StdResult<()> {
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(aggregator)).await?;

    Ok(())
}
