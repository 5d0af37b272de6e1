//! HTTP layer: axum router, handlers and error rendering on top of
//! [`StatService`](crate::core::StatService).
//!
//! ```text
//! request ──► ApiQuery<T> (parse + validate) ──► handler ──► StatService ──► Json
//!                    │                                            │
//!                    └──────────── StatsError::into_response ◄────┘
//! ```

pub mod docs;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
