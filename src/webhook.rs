// src/webhook.rs
use crate::config::Config;
use log::{debug, error, warn};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Mutation kinds a webhook consumer can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMethod {
    CreateOrUpdate,
    Delete,
}

impl EventMethod {
    fn http(self) -> reqwest::Method {
        match self {
            Self::CreateOrUpdate => reqwest::Method::POST,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for EventMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateOrUpdate => write!(f, "update-or-create"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

struct NotificationJob {
    method: EventMethod,
    body: String,
    delivery: String,
}

/// Best-effort fan-out of mutation events to the configured endpoints.
///
/// The endpoint list is injected at construction and immutable
/// afterwards. Events pass through a bounded queue consumed by a single
/// worker task: delivery never blocks or fails the request that caused
/// it, and a lagging consumer fills the queue instead of growing
/// unbounded in-process work. Overflowing events are dropped, logged
/// and counted. No retries, no ordering guarantee across endpoints, no
/// delivery confirmation.
pub struct WebhookNotifier {
    tx: Option<mpsc::Sender<NotificationJob>>,
    dropped: AtomicU64,
}

impl WebhookNotifier {
    /// A notifier without endpoints spawns no worker and ignores every
    /// `notify` call.
    pub fn new(config: &Config) -> Self {
        if config.webhook_endpoints.is_empty() {
            return Self {
                tx: None,
                dropped: AtomicU64::new(0),
            };
        }

        let (tx, mut rx) = mpsc::channel::<NotificationJob>(config.webhook_queue_size);
        let endpoints = config.webhook_endpoints.clone();
        let timeout = config.webhook_timeout();
        let client = reqwest::Client::new();

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                dispatch_event(&client, &endpoints, timeout, &job).await;
            }
        });

        Self {
            tx: Some(tx),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.tx.is_some()
    }

    /// Queues one event for delivery to every endpoint. Never blocks
    /// and reports nothing back to the caller: serialization problems
    /// and a full queue end here, logged.
    pub fn notify<T: Serialize>(&self, method: EventMethod, payload: &T) {
        let tx = match &self.tx {
            Some(tx) => tx,
            None => return,
        };

        let body = match serde_json::to_string_pretty(payload) {
            Ok(body) => body,
            Err(e) => {
                error!("unable to serialize {} event payload: {}", method, e);
                return;
            }
        };

        let job = NotificationJob {
            method,
            body,
            delivery: Uuid::new_v4().to_string(),
        };

        match tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "webhook queue full, dropping {} event {}",
                    job.method, job.delivery
                );
            }
            Err(TrySendError::Closed(job)) => {
                error!(
                    "webhook worker is gone, dropping {} event {}",
                    job.method, job.delivery
                );
            }
        }
    }

    /// Events discarded because the queue was full.
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Sends one event to each endpoint in turn. A failing endpoint is
/// logged and skipped; the remaining endpoints still get their
/// delivery.
async fn dispatch_event(
    client: &reqwest::Client,
    endpoints: &[String],
    timeout: Duration,
    job: &NotificationJob,
) {
    for endpoint in endpoints {
        debug!(
            "delivering {} event {} to {}",
            job.method, job.delivery, endpoint
        );

        let result = client
            .request(job.method.http(), endpoint.as_str())
            .timeout(timeout)
            .header("Content-Type", "application/json")
            .header("X-Lobby-Client", concat!("lobbyd/", env!("CARGO_PKG_VERSION")))
            .header("X-Lobby-Delivery", job.delivery.as_str())
            .body(job.body.clone())
            .send()
            .await;

        if let Err(e) = result {
            error!(
                "unable to deliver {} event to {}: {}",
                job.method, endpoint, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::server::GameServerDelete;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;
    use tokio::time::timeout as tokio_timeout;

    fn notifier_for(endpoints: Vec<String>, queue_size: usize) -> WebhookNotifier {
        let config = Config {
            webhook_endpoints: endpoints,
            webhook_timeout_secs: 2,
            webhook_queue_size: queue_size,
            ..Config::default()
        };
        WebhookNotifier::new(&config)
    }

    /// Accepts a single HTTP request, replies 200 and hands back the
    /// head (request line + headers) and body.
    async fn capture_one_request(listener: TcpListener) -> (String, String) {
        let (mut stream, _) = listener.accept().await.unwrap();
        let (head, body) = read_request(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        (head, body)
    }

    async fn read_request(stream: &mut TcpStream) -> (String, String) {
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];

        let header_end = loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the request arrived");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                line.to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(|v| v.trim().parse::<usize>().unwrap())
            })
            .unwrap_or(0);

        while raw.len() < header_end + content_length {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed mid body");
            raw.extend_from_slice(&buf[..n]);
        }

        let body =
            String::from_utf8_lossy(&raw[header_end..header_end + content_length]).to_string();
        (head, body)
    }

    /// A loopback port that refuses connections: bind, read the port,
    /// drop the listener.
    async fn refused_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/hook", addr)
    }

    #[tokio::test]
    async fn no_endpoints_means_an_inert_notifier() {
        let notifier = notifier_for(Vec::new(), 64);
        assert!(!notifier.is_active());

        // must be a no-op, not a panic or a hang
        notifier.notify(
            EventMethod::Delete,
            &GameServerDelete {
                serverurl: "tcp://gone.example:1".to_string(),
            },
        );
        assert_eq!(notifier.dropped_events(), 0);
    }

    #[tokio::test]
    async fn one_failing_endpoint_does_not_stop_the_fan_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let good = format!("http://{}/hook", listener.local_addr().unwrap());
        let bad = refused_endpoint().await;

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            tx.send(capture_one_request(listener).await).unwrap();
        });

        let notifier = notifier_for(vec![bad, good], 64);
        notifier.notify(
            EventMethod::CreateOrUpdate,
            &serde_json::json!({ "serverurl": "tcp://play.example:1" }),
        );

        let (head, body) = tokio_timeout(Duration::from_secs(5), rx)
            .await
            .expect("the healthy endpoint never saw the event")
            .unwrap();

        assert!(head.starts_with("POST /hook HTTP/1.1\r\n"), "head: {}", head);
        let head_lower = head.to_ascii_lowercase();
        assert!(head_lower.contains("x-lobby-client: lobbyd/"));
        assert!(head_lower.contains("x-lobby-delivery: "));
        assert!(head_lower.contains("content-type: application/json"));

        let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(payload["serverurl"], "tcp://play.example:1");
    }

    #[tokio::test]
    async fn delete_events_use_the_delete_method() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/hook", listener.local_addr().unwrap());

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            tx.send(capture_one_request(listener).await).unwrap();
        });

        let notifier = notifier_for(vec![endpoint], 64);
        notifier.notify(
            EventMethod::Delete,
            &GameServerDelete {
                serverurl: "tcp://gone.example:1".to_string(),
            },
        );

        let (head, body) = tokio_timeout(Duration::from_secs(5), rx)
            .await
            .expect("the endpoint never saw the delete")
            .unwrap();

        assert!(head.starts_with("DELETE /hook HTTP/1.1\r\n"), "head: {}", head);
        let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(payload["serverurl"], "tcp://gone.example:1");
    }

    #[tokio::test]
    async fn overflowing_the_queue_drops_and_counts() {
        // an endpoint that accepts the connection but never answers, so
        // the worker stays busy until its send timeout
        let stall = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/hook", stall.local_addr().unwrap());

        let notifier = notifier_for(vec![endpoint], 1);
        let payload = serde_json::json!({ "serverurl": "tcp://busy.example:1" });

        notifier.notify(EventMethod::CreateOrUpdate, &payload);
        // give the worker a moment to pull the first job off the queue
        tokio::time::sleep(Duration::from_millis(100)).await;
        notifier.notify(EventMethod::CreateOrUpdate, &payload);
        notifier.notify(EventMethod::CreateOrUpdate, &payload);

        assert!(
            notifier.dropped_events() >= 1,
            "expected at least one dropped event, got {}",
            notifier.dropped_events()
        );
        drop(stall);
    }

    #[test]
    fn event_methods_map_to_http_and_names() {
        assert_eq!(EventMethod::CreateOrUpdate.http(), reqwest::Method::POST);
        assert_eq!(EventMethod::Delete.http(), reqwest::Method::DELETE);
        assert_eq!(EventMethod::CreateOrUpdate.to_string(), "update-or-create");
        assert_eq!(EventMethod::Delete.to_string(), "delete");
    }
}
