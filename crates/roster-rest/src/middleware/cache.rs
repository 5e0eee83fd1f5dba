//! Read-through cache middleware.
//!
//! Applied per route with
//! `route_layer(from_fn_with_state(ReadThrough::new(..), read_through))`,
//! so it runs after routing and sees the matched path parameters. Only 200
//! responses are stored; anything else passes through uncached.

use roster_service::{CacheMediator, CachePolicy, KeyContext};
use axum::{
    body::{self, Body},
    extract::{RawPathParams, Request, State},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// State carried by one cached route.
#[derive(Clone, Debug)]
pub struct ReadThrough {
    mediator: CacheMediator,
    policy: CachePolicy,
}

impl ReadThrough {
    pub fn new(mediator: CacheMediator, policy: CachePolicy) -> Self {
        Self { mediator, policy }
    }
}

/// Serves the stored body for this request's key, or runs the handler and
/// stores its body when it answers 200.
pub async fn read_through(
    State(cache): State<ReadThrough>,
    params: Option<RawPathParams>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = KeyContext {
        path: request.uri().path().to_string(),
        params: params
            .map(|params| {
                params
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        query: request.uri().query().map(str::to_string),
    };
    let key = cache.policy.key_for(&ctx);

    let result = cache
        .mediator
        .get_or_compute(&key, cache.policy.ttl(), move || async move {
            let response = next.run(request).await;
            if response.status() != StatusCode::OK {
                return Err(response);
            }
            into_cacheable_body(response).await
        })
        .await;

    match result {
        Ok(body) => (
            [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response(),
        Err(response) => response,
    }
}

/// Collects a 200 response into a string. Bodies that cannot be stored are
/// handed back as an uncached response.
async fn into_cacheable_body(response: Response) -> Result<String, Response> {
    let (parts, body) = response.into_parts();
    let bytes = match body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read response body for caching: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };

    match String::from_utf8(bytes.to_vec()) {
        Ok(body) => Ok(body),
        Err(_) => Err(Response::from_parts(parts, Body::from(bytes))),
    }
}
