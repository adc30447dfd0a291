//! Listener setup

use crate::error::ServerError;
use crate::routes::routes;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tasksync_store::Store;

/// Bind the HTTP surface on `addr`
///
/// Returns the bound address (useful with port 0) and the server future,
/// which resolves after `shutdown` fires and in-flight requests finish.
///
/// # Errors
/// [`ServerError::Bind`] if the address cannot be bound.
pub fn bind(
    store: Arc<Store>,
    addr: SocketAddr,
    body_limit: u64,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, impl Future<Output = ()>), ServerError> {
    let (bound, server) =
        warp::serve(routes(store, body_limit)).try_bind_with_graceful_shutdown(addr, shutdown)?;
    tracing::info!(addr = %bound, "listening");
    Ok((bound, server))
}

/// Bind on an ephemeral localhost port and run in the background
///
/// Dropping or sending on the returned sender stops the server.
///
/// # Errors
/// [`ServerError::Bind`] if no port could be bound.
pub fn spawn_ephemeral(
    store: Arc<Store>,
    body_limit: u64,
) -> Result<(SocketAddr, tokio::sync::oneshot::Sender<()>), ServerError> {
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let (addr, server) = bind(
        store,
        SocketAddr::from(([127, 0, 0, 1], 0)),
        body_limit,
        async move {
            let _ = rx.await;
        },
    )?;
    tokio::spawn(server);
    Ok((addr, tx))
}
