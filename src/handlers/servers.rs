// src/handlers/servers.rs
use crate::encoding::encode_server_list;
use crate::models::server::GameServerMin;
use crate::query::{ListingQuery, ListingSelector};
use crate::storage::memory::ServerStorage;
use crate::utils::{peer_ip, RequestError, ViewLimiter};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error};
use serde_json::json;

/// Minimized listing for one platform, as JSON or the compact binary
/// payload. The workhorse read path for game clients.
pub async fn show_servers_minimized(
    storage: web::Data<ServerStorage>,
    rate_limiter: web::Data<ViewLimiter>,
    query: web::Query<ListingQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = peer_ip(&req)?;

    if rate_limiter.0.check_key(&peer_ip).is_err() {
        error!("rate limit exceeded on the server listing for {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let selector = ListingSelector::parse(&query)?;

    // read problems fall through to the empty-page response
    let servers = storage
        .get_by(
            &selector.platform,
            selector.appkey,
            selector.pagesize,
            selector.offset,
        )
        .unwrap_or_default();

    if servers.is_empty() {
        return Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": format!("No servers available for {}", selector.platform),
        })));
    }

    let minimized: Vec<GameServerMin> = servers.iter().map(|s| s.minimize()).collect();
    debug!(
        "listing {} {} servers for {}",
        minimized.len(),
        selector.platform,
        peer_ip
    );

    if selector.binary {
        Ok(HttpResponse::Ok()
            .content_type("application/octet-stream")
            .body(encode_server_list(&minimized)))
    } else {
        Ok(HttpResponse::Ok().json(minimized))
    }
}

/// Full directory dump with every stored field, pretty-printed for
/// humans poking at the API.
pub async fn show_servers(storage: web::Data<ServerStorage>) -> HttpResponse {
    let servers = match storage.get_all() {
        Ok(servers) => servers,
        Err(e) => {
            error!("unable to read the server directory: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Storage transaction issue",
                "errors": [e],
            }));
        }
    };

    if servers.is_empty() {
        return HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "No servers available",
        }));
    }

    match serde_json::to_string_pretty(&servers) {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(e) => {
            error!("unable to serialize the server directory: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Response serialization issue",
            }))
        }
    }
}
