//! # Unread Counter
//!
//! Background poll of the unread-message badge.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  UnreadWatcher::start(api, every)                                   │
//! │        │                                                             │
//! │        ▼  tokio::spawn                                               │
//! │  loop {                                                              │
//! │    select! {                                                         │
//! │      shutdown ───────────────────────────────► exit                  │
//! │      tick ──► signed in?  no ──► count = 0                           │
//! │                           yes ─► GET /conversations/unread-count     │
//! │                                   ok  ──► count = n                  │
//! │                                   err ──► keep last count            │
//! │    }                                                                 │
//! │  }                                                                   │
//! │        │                                                             │
//! │        ▼                                                             │
//! │  watch::Receiver<u32> ◄── badge subscribers                          │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use bookit_api::ApiClient;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

pub struct UnreadWatcher {
    count_rx: watch::Receiver<u32>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl UnreadWatcher {
    /// Spawns the poller. The first poll happens immediately.
    pub fn start(api: ApiClient, every: Duration) -> Self {
        let (count_tx, count_rx) = watch::channel(0u32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(poll_loop(api, every, count_tx, shutdown_rx));
        info!(interval_secs = every.as_secs(), "Unread watcher started");

        UnreadWatcher {
            count_rx,
            shutdown_tx,
            task,
        }
    }

    /// Latest known count.
    pub fn current(&self) -> u32 {
        *self.count_rx.borrow()
    }

    /// Receiver that wakes on every change.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.count_rx.clone()
    }

    /// Stops the poller and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
        info!("Unread watcher stopped");
    }
}

async fn poll_loop(
    api: ApiClient,
    every: Duration,
    count_tx: watch::Sender<u32>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = ticker.tick() => {
                if !api.has_token().await {
                    count_tx.send_if_modified(|count| std::mem::replace(count, 0) != 0);
                    continue;
                }

                match api.conversations().unread_count().await {
                    Ok(n) => {
                        count_tx.send_if_modified(|count| std::mem::replace(count, n) != n);
                    }
                    Err(e) => debug!(error = %e, "Unread poll failed"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    async fn serve(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        ApiClient::with_base_url(
            format!("http://{addr}/api").parse().unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_publishes_count_while_signed_in() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/conversations/unread-count",
            get(move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 3;
                    Json(json!({"count": n}))
                }
            }),
        );
        let api = serve(router).await;
        api.set_token("tok").await;

        let watcher = UnreadWatcher::start(api, Duration::from_millis(20));
        let mut rx = watcher.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|n| *n >= 4))
            .await
            .unwrap()
            .unwrap();
        assert!(watcher.current() >= 4);

        watcher.shutdown().await;
    }

    #[tokio::test]
    async fn test_signed_out_reads_zero_without_polling() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/conversations/unread-count",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Json(json!({"count": 9})) }
            }),
        );
        let api = serve(router).await;

        let watcher = UnreadWatcher::start(api, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(watcher.current(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        watcher.shutdown().await;
    }

    #[tokio::test]
    async fn test_failures_keep_last_count() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/conversations/unread-count",
            get(move || {
                let first = counter.fetch_add(1, Ordering::SeqCst) == 0;
                async move {
                    if first {
                        Ok(Json(json!({"count": 5})))
                    } else {
                        Err((StatusCode::INTERNAL_SERVER_ERROR, "boom"))
                    }
                }
            }),
        );
        let api = serve(router).await;
        api.set_token("tok").await;

        let watcher = UnreadWatcher::start(api, Duration::from_millis(10));
        let mut rx = watcher.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|n| *n == 5))
            .await
            .unwrap()
            .unwrap();

        tokio::time::timeout(Duration::from_secs(5), async {
            while hits.load(Ordering::SeqCst) < 4 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(watcher.current(), 5);

        watcher.shutdown().await;
    }
}
