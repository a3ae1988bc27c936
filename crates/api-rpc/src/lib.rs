//! JSON-RPC API Layer
//!
//! JSON-RPC 2.0 surface of the job board: public listings, employer job
//! management, admin operations, companies and applications.

pub mod auth;
pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use auth::StaticTokenAuthGate;
pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
