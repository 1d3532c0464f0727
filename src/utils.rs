// src/utils.rs
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::RateLimiter;
use lazy_static::lazy_static;
use serde_json::json;
use std::fmt;
use std::net::IpAddr;
use std::time::{Duration, Instant};

pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

// actix resolves app_data by type, so each rate limited route needs its
// own wrapper around the shared limiter type.
pub struct ViewLimiter(pub IpRateLimiter);
pub struct UpsertLimiter(pub IpRateLimiter);
pub struct DeleteLimiter(pub IpRateLimiter);

lazy_static! {
    /// Process start instant, read by the status endpoint.
    pub static ref STARTED_ON: Instant = Instant::now();
}

#[derive(Debug)]
pub enum RequestError {
    MissingPlatform,
    MissingPeerIp,
    RateLimitExceeded,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlatform => write!(f, "you need to submit a platform"),
            Self::MissingPeerIp => write!(f, "failed to extract the client address"),
            Self::RateLimitExceeded => write!(f, "rate limit exceeded"),
        }
    }
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({ "success": false, "message": self.to_string() });
        match self {
            Self::RateLimitExceeded => HttpResponse::TooManyRequests().json(body),
            _ => HttpResponse::BadRequest().json(body),
        }
    }
}

pub fn peer_ip(req: &HttpRequest) -> Result<IpAddr, RequestError> {
    match req.peer_addr() {
        Some(addr) => Ok(addr.ip()),
        None => Err(RequestError::MissingPeerIp),
    }
}

/// Parses an integer selector, falling back to a default instead of
/// failing the request.
pub fn atoi(value: &str, fallback: i32) -> i32 {
    value.parse().unwrap_or(fallback)
}

pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn uptime() -> String {
    format_duration(STARTED_ON.elapsed())
}

fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{}d {}h {}m {}s", days, hours, minutes, secs % 60)
}
