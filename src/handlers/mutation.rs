// src/handlers/mutation.rs
use crate::models::server::{GameServer, GameServerDelete};
use crate::storage::memory::ServerStorage;
use crate::utils::{peer_ip, DeleteLimiter, RequestError, UpsertLimiter};
use crate::webhook::{EventMethod, WebhookNotifier};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error, info};
use serde_json::json;

/// Registers or refreshes a server record. The server URL is the
/// identity: posting a known URL replaces its record.
pub async fn upsert_server(
    storage: web::Data<ServerStorage>,
    notifier: web::Data<WebhookNotifier>,
    rate_limiter: web::Data<UpsertLimiter>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = peer_ip(&req)?;

    if rate_limiter.0.check_key(&peer_ip).is_err() {
        error!("rate limit exceeded on upsert for {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let server: GameServer = match serde_json::from_slice(&body) {
        Ok(server) => server,
        Err(e) => {
            debug!("rejecting unparsable upsert from {}: {}", peer_ip, e);
            return Ok(validation_failure(vec![
                "submitted JSON cannot be parsed".to_string(),
            ]));
        }
    };

    let errors = server.validate();
    if !errors.is_empty() {
        debug!("rejecting invalid upsert from {}: {:?}", peer_ip, errors);
        return Ok(validation_failure(errors));
    }

    let stored = match storage.upsert(server) {
        Ok(stored) => stored,
        Err(e) => {
            error!("unable to store server record: {}", e);
            return Ok(storage_failure(e));
        }
    };

    info!(
        "upserted {} ({} on {})",
        stored.serverurl, stored.game, stored.platform
    );
    notifier.notify(EventMethod::CreateOrUpdate, &stored);

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Server correctly updated",
    })))
}

/// Drops a server record by URL. Unknown URLs succeed too: the caller
/// wanted the record gone and it is.
pub async fn delete_server(
    storage: web::Data<ServerStorage>,
    notifier: web::Data<WebhookNotifier>,
    rate_limiter: web::Data<DeleteLimiter>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = peer_ip(&req)?;

    if rate_limiter.0.check_key(&peer_ip).is_err() {
        error!("rate limit exceeded on delete for {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let target: GameServerDelete = match serde_json::from_slice(&body) {
        Ok(target) => target,
        Err(e) => {
            debug!("rejecting unparsable delete from {}: {}", peer_ip, e);
            return Ok(validation_failure(vec![
                "submitted JSON cannot be parsed".to_string(),
            ]));
        }
    };

    let errors = target.validate();
    if !errors.is_empty() {
        debug!("rejecting invalid delete from {}: {:?}", peer_ip, errors);
        return Ok(validation_failure(errors));
    }

    if let Err(e) = storage.delete(&target.serverurl) {
        error!("unable to delete server record: {}", e);
        return Ok(storage_failure(e));
    }

    info!("deleted {}", target.serverurl);
    notifier.notify(EventMethod::Delete, &target);

    Ok(HttpResponse::NoContent().finish())
}

fn validation_failure(errors: Vec<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "message": "Validation failed",
        "errors": errors,
    }))
}

fn storage_failure(error: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "success": false,
        "message": "Storage transaction issue",
        "errors": [error],
    }))
}
