// Application layer: wires configuration, store and HTTP server together.

pub mod server;

pub use server::{load_service, serve, StartupSummary};
