// src/main.rs
mod config;
mod encoding;
mod handlers;
mod models;
mod query;
mod storage;
mod utils;
mod webhook;

use crate::config::Config;
use crate::utils::{DeleteLimiter, UpsertLimiter, ViewLimiter, STARTED_ON};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use governor::RateLimiter;
use log::info;
use storage::memory::ServerStorage;
use webhook::WebhookNotifier;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger only once at the start
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    // Load .env before reading any configuration from the environment
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // Pin the uptime baseline before the first request can read it
    lazy_static::initialize(&STARTED_ON);

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind = format!("{}:{}", bind_address, port);

    let storage = web::Data::new(ServerStorage::new(config.clone()));
    let notifier = web::Data::new(WebhookNotifier::new(&config));

    // Set up rate limiters using config
    let view_limiter = web::Data::new(ViewLimiter(RateLimiter::keyed(config.view_quota())));
    let upsert_limiter = web::Data::new(UpsertLimiter(RateLimiter::keyed(config.upsert_quota())));
    let delete_limiter = web::Data::new(DeleteLimiter(RateLimiter::keyed(config.delete_quota())));

    if notifier.is_active() {
        info!(
            "webhook fan-out active for {} endpoint(s)",
            config.webhook_endpoints.len()
        );
    }

    info!("Starting lobby on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(storage.clone())
            .app_data(notifier.clone())
            .app_data(view_limiter.clone())
            .app_data(upsert_limiter.clone())
            .app_data(delete_limiter.clone())
            .route("/", web::get().to(handlers::lobby::show_lobby))
            .route("/view", web::get().to(handlers::servers::show_servers_minimized))
            .route("/viewFull", web::get().to(handlers::servers::show_servers))
            .route("/server", web::post().to(handlers::mutation::upsert_server))
            .route("/server", web::delete().to(handlers::mutation::delete_server))
            .route("/version", web::get().to(handlers::status::show_status))
            .route("/docs", web::get().to(handlers::lobby::show_docs))
    })
    .bind(&bind)?
    .run()
    .await
}
