//! Restgate demo server.
//!
//! Discovers the bundled demo services from the configured manifest
//! directory, derives the route table, and serves it over HTTP.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8080 restgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `SERVICES_DIR` | `./demos/services` | Manifest directory to scan |
//! | `SERVICES_NS` | *(unset)* | Namespace prefix for discovered identifiers |
//! | `AUTH_TOKEN` | *(unset)* | When set, requests must carry `Authorization: Bearer <token>` |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod services;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use restgate_core::RestgateConfig;
use restgate_http::{App, AuthCallback, Controller, RestHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config
/// value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the bearer-token authorization callback from `AUTH_TOKEN`, when
/// the variable is set.
fn auth_callback_from_env() -> Option<AuthCallback> {
    let token = std::env::var("AUTH_TOKEN").ok()?;
    let expected = format!("Bearer {token}");
    Some(Arc::new(move |ctx| {
        ctx.header("authorization") == Some(expected.as_str())
    }))
}

/// Run the accept loop, serving connections until a shutdown signal is
/// received.
async fn serve(listener: TcpListener, service: RestHttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = RestgateConfig::from_env();
    init_tracing(&config.log_level)?;

    let registry = services::registry();

    let mut controller = Controller::new();
    controller.set_app(Some(App::new(config.clone())))?;

    let discovered = controller.all_services(&registry)?;
    let routes = controller.add_auto_routing(&discovered)?;

    if let Some(callback) = auth_callback_from_env() {
        controller.set_auth_callback(Some(callback))?;
        info!("authorization callback configured from AUTH_TOKEN");
    }

    let service = RestHttpService::new(controller.into_app()?);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        services = discovered.len(),
        routes,
        version = VERSION,
        "starting restgate server",
    );

    serve(listener, service).await
}
