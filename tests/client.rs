use fichier::classifier::ErrorClass;
use fichier::error::TransportError;
use fichier::retry::RetryPolicy;
use fichier::transport::{Request, Response, Transport};
use fichier::ClientBuilder;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn init() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Always asks to try again later, counting the calls
#[derive(Default)]
struct BusyTransport {
    calls: AtomicU32,
    cancel_on_first_call: Option<CancellationToken>,
}

#[async_trait::async_trait]
impl Transport for BusyTransport {
    async fn send(&self, _request: Request) -> Result<Response, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref token) = self.cancel_on_first_call {
            token.cancel();
        }
        Ok(Response::new(
            200,
            r#"{"status":"KO","message":"Please try again later"}"#,
        ))
    }
}

#[tokio::test]
async fn cancelling_during_backoff_stops_before_next_attempt() {
    init();
    let token = CancellationToken::new();
    let transport = Arc::new(BusyTransport {
        calls: AtomicU32::new(0),
        cancel_on_first_call: Some(token.clone()),
    });
    let client = ClientBuilder::default()
        .with_retry_policy(RetryPolicy::new(5, Duration::from_secs(3600)))
        .build_with_transport(transport.clone())
        .with_cancellation(token);
    let err = client.list_folders(0).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.attempts, 1);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancelling_a_pending_backoff_returns_early() {
    init();
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });
    let transport = Arc::new(BusyTransport::default());
    let client = ClientBuilder::default()
        .with_retry_policy(RetryPolicy::new(5, Duration::from_secs(3600)))
        .with_cancellation_token(token)
        .build_with_transport(transport.clone());
    let started = std::time::Instant::now();
    let err = client.list_files(0).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.class, None);
    assert_eq!(err.attempts, 1);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test]
async fn exhausted_attempts_are_reported() {
    init();
    let transport = Arc::new(BusyTransport::default());
    let client = ClientBuilder::default()
        .with_retry_policy(RetryPolicy::new(4, Duration::from_millis(1)))
        .build_with_transport(transport.clone());
    let err = client.list_files(0).await.unwrap_err();
    assert_eq!(err.class, Some(ErrorClass::Transient));
    assert_eq!(err.attempts, 4);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_calls_share_the_client() {
    init();
    let mut server = mockito::Server::new_async().await;
    let folders = server
        .mock("POST", "/folder/ls.cgi")
        .with_status(200)
        .with_body(r#"{"folder_id":0,"name":"root","Status":"OK","sub_folders":[]}"#)
        .expect(4)
        .create_async()
        .await;
    let files = server
        .mock("POST", "/file/ls.cgi")
        .with_status(200)
        .with_body(r#"{"Status":"OK","items":[]}"#)
        .expect(4)
        .create_async()
        .await;
    let client = ClientBuilder::default()
        .with_base_url(server.url())
        .build()
        .unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                let (sub_folders, items) =
                    tokio::join!(client.list_folders(0), client.list_files(0));
                sub_folders.unwrap().folders.len() + items.unwrap().items.len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 0);
    }
    folders.assert_async().await;
    files.assert_async().await;
}
