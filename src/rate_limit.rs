//! Per-client fixed-window rate limiting.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Mutex,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

const WINDOW: Duration = Duration::from_secs(60);

/// Table size above which expired windows are swept.
const PRUNE_THRESHOLD: usize = 4096;

// ---

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    limit: u32,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    // ---
    /// `limit` requests per client per minute; 0 disables limiting.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request for `client` and report whether it is allowed.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        // ---
        if self.limit == 0 {
            return true;
        }

        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        if windows.len() > PRUNE_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < WINDOW);
        }

        let window = windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= WINDOW {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.limit {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Identify the caller.
///
/// Proxy headers are only consulted when `trust_proxy_headers` is set, since
/// any client can send them. Otherwise the peer address is used.
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> String {
    // ---
    let peer_key = || {
        peer.map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    };
    if !trust_proxy_headers {
        return peer_key();
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header("cf-connecting-ip") {
        return ip.to_string();
    }
    if let Some(first) = header("x-forwarded-for").and_then(|v| v.split(',').next()) {
        return first.trim().to_string();
    }
    peer_key()
}

/// Middleware rejecting clients that exceed their budget with 429.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    // ---
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(request.headers(), peer, state.config.trust_proxy_headers);

    if !state.limiter.check(&client) {
        warn!(client = %client, path = %request.uri().path(), "rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_limit_per_client() {
        // ---
        let limiter = RateLimiter::new(2);
        assert!(limiter.check("1.1.1.1"));
        assert!(limiter.check("1.1.1.1"));
        assert!(!limiter.check("1.1.1.1"));

        // Other clients have their own budget
        assert!(limiter.check("2.2.2.2"));
    }

    #[test]
    fn test_window_resets() {
        // ---
        let limiter = RateLimiter::new(1);
        let start = Instant::now();
        assert!(limiter.check_at("c", start));
        assert!(!limiter.check_at("c", start + Duration::from_secs(59)));
        assert!(limiter.check_at("c", start + WINDOW));
    }

    #[test]
    fn test_zero_disables() {
        // ---
        let limiter = RateLimiter::new(0);
        for _ in 0..1000 {
            assert!(limiter.check("c"));
        }
    }

    #[test]
    fn test_client_key_precedence() {
        // ---
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers, None, true), "unknown");
        assert_eq!(client_key(&headers, Some(peer), true), "10.0.0.9");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.7");

        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_key(&headers, Some(peer), true), "198.51.100.4");
    }

    #[test]
    fn test_proxy_headers_ignored_unless_trusted() {
        // ---
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.4"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        assert_eq!(client_key(&headers, Some(peer), false), "10.0.0.9");
        assert_eq!(client_key(&headers, None, false), "unknown");

        // Rotating spoofed headers does not buy a fresh budget
        let limiter = RateLimiter::new(1);
        for spoofed in ["1.1.1.1", "2.2.2.2"] {
            headers.insert("cf-connecting-ip", HeaderValue::from_static(spoofed));
            let key = client_key(&headers, Some(peer), false);
            assert_eq!(limiter.check(&key), spoofed == "1.1.1.1");
        }
    }
}
