pub mod action;
pub mod api;
pub mod client;
pub mod context;
pub mod cookie;
pub mod except;
pub mod flash;
pub mod input;
pub mod session;
pub mod tools;
pub mod url;
pub mod validation;

use crate::app::Admin;
use crate::erx::{self, ResultEX};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// All routes with session handling and request tracing.
pub fn make_router(admin: Arc<Admin>) -> Router {
    let session = Arc::new(admin.conf().session.clone());

    action::all_actions()
        .with_state(admin)
        .layer(axum::middleware::from_fn_with_state(session, session::session_layer))
        .layer(TraceLayer::new_for_http())
}

pub struct Web {
    name: String,
    bind: String,
    router: Router,
}

impl Web {
    pub fn new(name: &str, bind: &str, router: Router) -> Self {
        Web { name: name.to_string(), bind: bind.to_string(), router }
    }

    pub fn from_admin(admin: Arc<Admin>) -> Self {
        let name = admin.conf().name.clone();
        let bind = admin.conf().web.bind_addr();
        Self::new(&name, &bind, make_router(admin))
    }

    pub fn bind(&self) -> &str {
        &self.bind
    }

    /// serve until `shutdown` resolves, in-flight requests are drained
    pub async fn serve<F>(self, shutdown: F) -> ResultEX
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listen = tokio::net::TcpListener::bind(self.bind.as_str()).await.map_err(erx::amp(&format!("bind {}", self.bind)))?;

        info!("Web[ {} ] served : {}", self.name, self.bind);
        axum::serve(listen, self.router).with_graceful_shutdown(shutdown).await.map_err(erx::amp("serve"))?;
        info!("Web[ {} ] terminated", self.name);

        Ok(())
    }
}

/// resolves on Ctrl-C
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("ctrl-c received, shutting down"),
        Err(err) => tracing::error!("ctrl-c handler failed: {}", err),
    }
}
