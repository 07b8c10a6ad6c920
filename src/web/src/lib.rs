mod api;
mod error;
mod routes;
mod session;

pub use error::{ApiError, ApiResult};
pub use session::SessionHeaders;

use crate::routes::ServerRoutes;
use axum::response::IntoResponse;
use engine::{LeagueSettings, MemoryStore, SessionContext};
use log::{error, info};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

pub const DEFAULT_PORT: u16 = 18000;

pub struct LeagueServer {
    data: LeagueAppData,
    port: u16,
}

impl LeagueServer {
    pub fn new(data: LeagueAppData, port: u16) -> Self {
        LeagueServer { data, port }
    }

    pub async fn run(&self) -> std::io::Result<()> {
        let app = ServerRoutes::create()
            .layer(
                ServiceBuilder::new()
                    // Catch panics in handlers and convert them to 500 errors
                    .layer(CatchPanicLayer::custom(|_err| {
                        ApiError::InternalError(String::from("handler panicked")).into_response()
                    })),
            )
            .with_state(self.data.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await.inspect_err(|e| {
            error!("Failed to bind to address {}: {}", addr, e);
        })?;

        info!("listen at: http://localhost:{}", self.port);

        axum::serve(listener, app).await.inspect_err(|e| {
            error!("Server error: {}", e);
        })
    }
}

pub type SharedSession = Arc<Mutex<SessionContext>>;

pub struct LeagueAppData {
    pub store: Arc<MemoryStore>,
    pub settings: Arc<LeagueSettings>,
    /// The map lock is only held to look a session up; each session has its
    /// own lock for the duration of a request.
    pub sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl LeagueAppData {
    pub fn new(store: MemoryStore, settings: LeagueSettings) -> Self {
        LeagueAppData {
            store: Arc::new(store),
            settings: Arc::new(settings),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn session(&self, session_id: &str) -> SharedSession {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SessionContext::new(session_id, None))));

        Arc::clone(session)
    }
}

impl Clone for LeagueAppData {
    fn clone(&self) -> Self {
        LeagueAppData {
            store: Arc::clone(&self.store),
            settings: Arc::clone(&self.settings),
            sessions: Arc::clone(&self.sessions),
        }
    }
}
