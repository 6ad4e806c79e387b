//! Listener setup and the accept loops for both serving modes.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use jiff::Timestamp;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::service::Routes;
use tonic_health::pb::health_server::HealthServer;

use crate::clock::format_utc_offset;
use crate::config::{ServeMode, ServerConfig};
use crate::dispatch::{HybridService, boxed_routes};
use crate::error::{Error, Result};
use crate::health::HealthService;
use crate::http;
use crate::proto::time_server::TimeServer;
use crate::service::TimeService;

/// A bound listener plus the configuration it serves.
pub struct Server {
    config: Arc<ServerConfig>,
    listener: TcpListener,
}

impl Server {
    /// Bind the configured listen address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] if the address cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let addr = listen_addr(&config.listen_addr);
        let listener = TcpListener::bind(&*addr)
            .await
            .map_err(|source| Error::Bind {
                addr: config.listen_addr.clone(),
                source,
            })?;

        Ok(Self {
            config: Arc::new(config),
            listener,
        })
    }

    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the process is terminated or the listener fails.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting connections fails, or if the gRPC-only
    /// transport stops with an error.
    pub async fn run(self) -> Result<()> {
        let config = &self.config;
        tracing::info!(
            addr = %self.local_addr()?,
            mode = %config.mode,
            time_zone = config.time_zone.iana_name().unwrap_or("UTC"),
            utc_offset = %format_utc_offset(config.time_zone.to_offset(Timestamp::now())),
            hostname = %config.hostname,
            "Listening..."
        );

        let mode = config.mode;
        match mode {
            ServeMode::Grpc => self.run_grpc().await,
            ServeMode::Hybrid => self.run_hybrid().await,
        }
    }

    async fn run_grpc(self) -> Result<()> {
        tonic::transport::Server::builder()
            .add_routes(grpc_routes(&self.config))
            .serve_with_incoming(TcpListenerStream::new(self.listener))
            .await?;

        Ok(())
    }

    /// Serve HTTP/1.1 and cleartext HTTP/2 on every accepted connection.
    ///
    /// HTTP/2 is only recognised from the connection preface (prior
    /// knowledge). An HTTP/1.1 request asking to `Upgrade: h2c` is answered
    /// as plain HTTP/1.1.
    async fn run_hybrid(self) -> Result<()> {
        let time_service = TimeService::new(&self.config);
        let service = HybridService::new(
            boxed_routes::<Incoming>(grpc_routes(&self.config)),
            http::router(time_service),
        );

        loop {
            let (stream, remote_addr) = self.listener.accept().await?;
            let service = service.clone();

            tokio::spawn(async move {
                let builder = auto::Builder::new(TokioExecutor::new());
                let connection = builder
                    .serve_connection(TokioIo::new(stream), TowerToHyperService::new(service));

                if let Err(err) = connection.await {
                    if is_disconnect_error(err.as_ref()) {
                        tracing::debug!(%remote_addr, "Connection closed: {}", err);
                    } else {
                        tracing::warn!(%remote_addr, "Error serving connection: {}", err);
                    }
                }
            });
        }
    }
}

/// The gRPC services: `time.Time` and `grpc.health.v1.Health`.
///
/// Unknown methods are answered with `Unimplemented`.
pub fn grpc_routes(config: &Arc<ServerConfig>) -> Routes {
    Routes::new(TimeServer::new(TimeService::new(config)))
        .add_service(HealthServer::new(HealthService))
        .prepare()
}

/// Expand a bare `:port` into an all-interfaces address.
fn listen_addr(addr: &str) -> Cow<'_, str> {
    if addr.starts_with(':') {
        Cow::Owned(format!("0.0.0.0{addr}"))
    } else {
        Cow::Borrowed(addr)
    }
}

fn is_disconnect_error(err: &(dyn StdError + Send + Sync)) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("broken pipe")
        || msg.contains("connection reset")
        || msg.contains("connection aborted")
        || msg.contains("unexpected eof")
        || msg.contains("shutting down")
}
