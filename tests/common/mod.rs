//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use customer_sdk::{CustomerClient, CustomerInput};
use customer_service::config::{ServiceConfig, StoreBackend};
use customer_service::store::{MemoryCustomerStore, SharedStore};
use customer_service::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A running service on an ephemeral port, backed by the in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Arc<MemoryCustomerStore>,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> CustomerClient {
        CustomerClient::new(&self.url(""))
    }

    pub fn http(&self) -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with<F>(customize: F) -> TestApp
where
    F: FnOnce(&mut ServiceConfig),
{
    let mut config = test_config();
    customize(&mut config);

    let store = Arc::new(MemoryCustomerStore::new());
    let (addr, shutdown) = serve(config, store.clone()).await;

    TestApp { addr, store, shutdown }
}

/// Loopback listener, memory backend, no metrics exporter.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.database.backend = StoreBackend::Memory;
    config.observability.metrics_enabled = false;
    config
}

/// Serve `store` in the background until the returned handle is triggered.
pub async fn serve(config: ServiceConfig, store: SharedStore) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn alice() -> CustomerInput {
    CustomerInput::new("Alice", "1 Main St", "a@x.com", "555-1234", "2023-01-01")
}

/// Create `count` distinct customers and return their ids.
#[allow(dead_code)]
pub async fn seed(client: &CustomerClient, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let input = CustomerInput::new(
            &format!("Customer{}", i),
            &format!("{} Elm St", i + 1),
            &format!("c{}@example.com", i),
            &format!("555-{:04}", 1000 + i),
            "2020-06-15",
        );
        ids.push(client.create(&input).await.unwrap().id);
    }
    ids
}
