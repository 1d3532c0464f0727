use std::env;
use std::time::Duration;
use std::num::NonZeroU32;
use governor::Quota;

#[derive(Clone)]
pub struct Config {
    // Webhook fan-out: loaded once at startup, read-only afterwards
    pub webhook_endpoints: Vec<String>,
    pub webhook_timeout_secs: u64,
    pub webhook_queue_size: usize,

    // Directory limits
    pub max_servers: usize,

    // Rate limiting configs
    pub view_period_secs: u64,
    pub view_burst_limit: u32,
    pub upsert_period_secs: u64,
    pub upsert_burst_limit: u32,
    pub delete_period_secs: u64,
    pub delete_burst_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_endpoints: Vec::new(),
            webhook_timeout_secs: 2,
            webhook_queue_size: 64,
            max_servers: 5000,
            view_period_secs: 5,
            view_burst_limit: 120,
            upsert_period_secs: 60,
            upsert_burst_limit: 100,
            delete_period_secs: 5,
            delete_burst_limit: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            webhook_endpoints: env::var("WEBHOOK_ENDPOINTS")
                .map(|v| parse_endpoint_list(&v))
                .unwrap_or_default(),

            webhook_timeout_secs: env::var("WEBHOOK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),

            // tokio channels need a capacity of at least one
            webhook_queue_size: env::var("WEBHOOK_QUEUE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64)
                .max(1),

            max_servers: env::var("MAX_SERVERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),

            view_period_secs: env::var("VIEW_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            view_burst_limit: env::var("VIEW_BURST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),

            upsert_period_secs: env::var("UPSERT_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),

            upsert_burst_limit: env::var("UPSERT_BURST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),

            delete_period_secs: env::var("DELETE_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            delete_burst_limit: env::var("DELETE_BURST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn view_quota(&self) -> Quota {
        Quota::with_period(Duration::from_secs(self.view_period_secs))
            .unwrap()
            .allow_burst(NonZeroU32::new(self.view_burst_limit).unwrap())
    }

    pub fn upsert_quota(&self) -> Quota {
        Quota::with_period(Duration::from_secs(self.upsert_period_secs))
            .unwrap()
            .allow_burst(NonZeroU32::new(self.upsert_burst_limit).unwrap())
    }

    pub fn delete_quota(&self) -> Quota {
        Quota::with_period(Duration::from_secs(self.delete_period_secs))
            .unwrap()
            .allow_burst(NonZeroU32::new(self.delete_burst_limit).unwrap())
    }
}

fn parse_endpoint_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
