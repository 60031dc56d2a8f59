//! Mode routing
//!
//! Only the HTTP server runs long-lived; `config generate` is handled in `main`.

pub mod server;

pub use server::run_server;
