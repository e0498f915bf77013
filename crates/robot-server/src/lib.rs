//! Robot protocol server over TCP.
//!
//! Binds the runtime-agnostic machine from `robot-core` to real sockets
//! and files: a tokio listener spawning one supervised task per accepted
//! connection, a watchdog bounding each connection's lifetime, and a
//! filesystem blob store receiving transferred photos.

pub mod server;
pub mod sink;
pub mod supervisor;

pub use server::{DEFAULT_PORT, Server, ServerConfig};
pub use sink::FsBlobStore;
pub use supervisor::{Outcome, SupervisorConfig, supervise};
