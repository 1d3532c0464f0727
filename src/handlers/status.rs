// src/handlers/status.rs
use crate::utils::uptime;
use crate::webhook::WebhookNotifier;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Liveness and version endpoint, also surfaces webhook delivery health.
pub async fn show_status(notifier: web::Data<WebhookNotifier>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": uptime(),
        "webhooks_active": notifier.is_active(),
        "webhook_events_dropped": notifier.dropped_events(),
    }))
}
