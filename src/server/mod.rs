// Server module entry point
// Listener setup, the accept loop, and per-connection serving

pub mod accept_loop;
pub mod connection;
pub mod listener;

pub use accept_loop::run;
pub use listener::bind_listener;
