// Listener module
// Creates the TCP listener the accept loop runs on

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Pending-connection queue length passed to `listen(2)`
const BACKLOG: i32 = 1024;

/// Create a non-blocking `TcpListener` bound to `addr`
///
/// `SO_REUSEADDR` lets the server restart immediately while old sockets sit
/// in `TIME_WAIT`.
pub fn bind_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.port() > 0);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn test_port_in_use_is_error() {
        let first = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let taken = first.local_addr().unwrap();
        assert!(bind_listener(taken).is_err());
    }
}
