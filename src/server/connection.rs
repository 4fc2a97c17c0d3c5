// Connection handling module
// Accepts a TCP connection and serves it with hyper on its own task

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    // Increment counter first, then check limit
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve one connection on a spawned task.
///
/// HTTP/1.1 with optional keep-alive. Only the wait for request headers is
/// bounded (`performance.header_read_timeout`); a request already being
/// handled runs to completion. The connection counter is released when the
/// task ends.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let header_timeout = (performance.header_read_timeout > 0)
            .then(|| Duration::from_secs(performance.header_read_timeout));

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(header_timeout)
            .keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), peer_addr)
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
