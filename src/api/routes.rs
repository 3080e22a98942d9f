//! Route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::feed;
use crate::{Error, Result};

/// Body of `POST /feed/read`.
#[derive(Debug, Deserialize)]
pub struct ReadFeedRequest {
    pub url: Option<String>,
}

/// POST /feed/read - Fetch and parse the feed at `url`
///
/// Answers 200 with the legacy text rendering (served as `application/json`
/// even though it is not valid JSON). A missing `url`, an unretrievable feed
/// or an unparseable document all answer 400.
pub async fn read_feed(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ReadFeedRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let url = request.url.ok_or(Error::MissingUrl)?;

    let parsed = feed::read_feed(&state.fetcher, &url).await?;
    let body = feed::to_text(&parsed)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
