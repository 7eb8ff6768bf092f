//! gRPC server bootstrap for the extension service
//!
//! Binds a TCP or UNIX listener according to [`ListenerConfig`] and serves
//! the [`GatewayExtension`] hooks until the shutdown future resolves.

use crate::config::{ListenerConfig, ListenerType};
use crate::errors::{Error, Result};
use crate::extension::proto::envoy_gateway_extension_server::EnvoyGatewayExtensionServer;
use crate::extension::GatewayExtension;
use std::future::Future;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

/// Bind the configured listener and serve `extension` until `shutdown_signal` resolves
pub async fn start_extension_server<F>(
    config: &ListenerConfig,
    extension: GatewayExtension,
    shutdown_signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    match config.kind {
        ListenerType::Tcp => {
            let addr = config.tcp.socket_addr()?;
            let listener = TcpListener::bind(addr).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::AddrInUse {
                    Error::transport(format!(
                        "Extension server failed to bind to {}: port {} is already in use",
                        addr,
                        addr.port()
                    ))
                } else {
                    Error::transport(format!("Extension server failed to bind to {}: {}", addr, e))
                }
            })?;
            serve_listener(listener, extension, shutdown_signal).await
        }
        ListenerType::Unix => serve_unix(config, extension, shutdown_signal).await,
    }
}

/// Serve `extension` on an already bound TCP listener
pub async fn serve_listener<F>(
    listener: TcpListener,
    extension: GatewayExtension,
    shutdown_signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    info!(address = %local_addr, "Extension server listening on TCP");

    Server::builder()
        .add_service(EnvoyGatewayExtensionServer::new(extension))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown_signal)
        .await
        .map_err(|e| Error::transport(format!("Extension server failed: {}", e)))
}

#[cfg(unix)]
async fn serve_unix<F>(
    config: &ListenerConfig,
    extension: GatewayExtension,
    shutdown_signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    use tokio::net::UnixListener;
    use tokio_stream::wrappers::UnixListenerStream;

    let path = &config.unix.socket_path;
    match std::fs::remove_file(path) {
        Ok(()) => info!(path = %path.display(), "Removed stale extension socket"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let listener = UnixListener::bind(path).map_err(|e| {
        Error::transport(format!("Extension server failed to bind to {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), "Extension server listening on UNIX socket");

    Server::builder()
        .add_service(EnvoyGatewayExtensionServer::new(extension))
        .serve_with_incoming_shutdown(UnixListenerStream::new(listener), shutdown_signal)
        .await
        .map_err(|e| Error::transport(format!("Extension server failed: {}", e)))
}

#[cfg(not(unix))]
async fn serve_unix<F>(
    _config: &ListenerConfig,
    _extension: GatewayExtension,
    _shutdown_signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    Err(Error::config("UNIX socket listeners are not supported on this platform"))
}
