//! Network Module
//!
//! UDP transport, reply policy and the serving loop.
//!
//! ## Architecture
//! - `Connection`: bound socket, send / receive-with-discard
//! - Responder (`Connection::respond`): ack/response decision
//! - `Server`: single receive loop, worker thread pool for handlers

mod connection;
mod responder;
mod server;

pub use connection::Connection;
pub use server::{Handler, Reply, Server, ShutdownHandle};
