//! # HTTP Server
//!
//! Combines the book and health routers, applies CORS and request
//! observation, and serves until a shutdown signal arrives.

use std::future::Future;
use std::sync::Arc;

use axum::handler::HandlerWithoutStateExt;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::observability::{Event, Logger};
use crate::rest_api::{book_routes, BookGateway, RestError};
use crate::storage::BookStore;

use super::config::HttpServerConfig;
use super::health_routes::{health_routes, HealthState};
use super::observe::observe_request;

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Build a server over an already opened store
    pub fn new(config: HttpServerConfig, environment: &str, store: Arc<dyn BookStore>) -> Self {
        let router = Self::build_router(&config, environment, store);
        Self { config, router }
    }

    fn build_router(
        config: &HttpServerConfig,
        environment: &str,
        store: Arc<dyn BookStore>,
    ) -> Router {
        let gateway = Arc::new(BookGateway::new(store));
        let health_state = Arc::new(HealthState {
            environment: environment.to_string(),
        });

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        // Known path with an unrouted verb is a 404 like any unknown path
        let router = Router::new()
            .merge(health_routes(health_state))
            .merge(book_routes(gateway))
            .method_not_allowed_fallback(route_not_found);

        let router = match &config.static_dir {
            Some(dir) => router.fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .not_found_service(route_not_found.into_service()),
            ),
            None => router.fallback(route_not_found),
        };

        router
            .layer(middleware::from_fn(observe_request))
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address. `host` may be an IP or a hostname.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.config.host.as_str(), self.config.port)).await
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?.to_string();
        Logger::info(Event::Serving, &[("addr", &local_addr)]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn route_not_found() -> RestError {
    RestError::RouteNotFound
}

/// Resolves on SIGINT, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            Logger::warn(Event::ShutdownStart, &[("signal_error", &e.to_string())]);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    Logger::info(Event::ShutdownStart, &[]);
}
