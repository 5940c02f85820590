use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use ops_portal::{config::Config, Portal};

/// Serves `routes` under `/api` on an ephemeral port and returns the API
/// base URL.
pub async fn spawn_backend(routes: Router) -> String {
    let app = Router::new().nest("/api", routes);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });
    format!("http://{}/api", addr)
}

pub fn portal(base_url: &str) -> Portal {
    Portal::new(&Config::new(base_url)).expect("portal")
}

#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

#[allow(dead_code)]
impl Hits {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
