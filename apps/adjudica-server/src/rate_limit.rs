//! Fixed-window rate limiting keyed by client IP.

use crate::config::RateLimitConfig;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    windows: DashMap<IpAddr, Window>,
    window: Duration,
    max_requests: u32,
    max_entries: usize,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            max_entries: config.max_entries,
        }
    }

    /// Record one request from `ip` and report whether it is allowed.
    pub fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut entry = self.windows.entry(ip).or_insert_with(|| Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;
        let allowed = entry.count <= self.max_requests;
        drop(entry);

        if self.windows.len() > self.max_entries {
            self.evict_expired(now);
        }
        allowed
    }

    fn evict_expired(&self, now: Instant) {
        self.windows
            .retain(|_, window| now.duration_since(window.started) < self.window);
    }
}

pub async fn middleware(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.allow(addr.ip()) {
        tracing::warn!(client = %addr.ip(), "límite de solicitudes excedido");
        let body = serde_json::json!({
            "success": false,
            "message": "Demasiadas solicitudes, intente nuevamente más tarde",
        });
        return (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    }
    next.run(request).await
}
