use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id for one request, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuses a caller-supplied id when it is non-blank visible ASCII.
    fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        match supplied {
            Some(id) => Self(id.to_string()),
            None => Self(Uuid::new_v4().to_string()),
        }
    }
}

/// Tags every request with a [`RequestId`] and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let header = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut res = next.run(req).await;
    if let Some(value) = header {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: usize,
}

/// Fixed-window limiter shared by every API route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    capacity: usize,
    length: Duration,
    window: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(capacity: usize, length: Duration) -> Self {
        Self {
            capacity,
            length,
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(capacity: usize) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    /// Takes one slot from the current window, opening a fresh window once
    /// the old one has run its length. `false` when the window is full.
    pub async fn try_acquire(&self) -> bool {
        let mut window = self.window.lock().await;
        if window.opened_at.elapsed() >= self.length {
            *window = Window {
                opened_at: Instant::now(),
                used: 0,
            };
        }
        if window.used >= self.capacity {
            return false;
        }
        window.used += 1;
        true
    }
}

/// Rejects requests over the limit with a `rate_limited` error envelope.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire().await {
        return next.run(req).await;
    }

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| RequestId::from_headers(req.headers()), Clone::clone);
    tracing::warn!(
        request_id = %request_id.0,
        capacity = limiter.capacity,
        path = %req.uri().path(),
        "rate limit exceeded"
    );
    ApiError::new(request_id.0, "rate_limited", "rate limit exceeded").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn window_fills_then_reopens() {
        let limiter = RateLimitState::new(2, Duration::from_millis(50));
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn clones_share_one_window() {
        let limiter = RateLimitState::per_minute(1);
        let other = limiter.clone();
        assert!(limiter.try_acquire().await);
        assert!(!other.try_acquire().await);
    }

    #[test]
    fn blank_supplied_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        let id = RequestId::from_headers(&headers);
        assert!(Uuid::parse_str(&id.0).is_ok());
    }

    #[test]
    fn supplied_id_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-42"));
        assert_eq!(RequestId::from_headers(&headers).0, "req-42");
    }
}
