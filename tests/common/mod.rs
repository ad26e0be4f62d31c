//! Shared utilities for integration testing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tasks_api::config::ServerConfig;
use tasks_api::http::HttpServer;
use tasks_api::lifecycle::Shutdown;
use tasks_api::store::Datastore;

/// A running server instance bound to an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub db_path: PathBuf,
    shutdown: Arc<Shutdown>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
        let _ = std::fs::remove_file(&self.db_path);
    }
}

/// Start the real server with a fresh temp-file datastore.
pub async fn start_server() -> TestServer {
    let db_path =
        std::env::temp_dir().join(format!("tasks-api-it-{}.json", uuid::Uuid::new_v4()));

    let config = ServerConfig {
        storage: tasks_api::config::StorageConfig {
            path: db_path.clone(),
        },
        ..ServerConfig::default()
    };

    let store = Arc::new(Datastore::open(&db_path).await.unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config, store).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the acceptor a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        base_url: format!("http://{}", addr),
        db_path,
        shutdown,
    }
}
