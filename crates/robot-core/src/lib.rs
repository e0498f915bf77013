//! Robot protocol core logic
//!
//! The per-connection protocol state machine, decoupled from any concrete
//! transport or runtime. The machine consumes bytes through a cursor
//! abstraction and hands status lines back to a driver loop; durable
//! storage for transferred photos is an injected capability. This keeps
//! protocol correctness testable over in-memory streams, with the TCP
//! binding living in `robot-server`.
//!
//! # Components
//!
//! - [`cursor`]: one-byte-at-a-time view of the inbound stream
//! - [`machine`]: the state machine (login handshake, command loop, FOTO
//!   ingestion)
//! - [`session`]: per-connection state and the driver loop
//! - [`blob`]: storage capability consumed during FOTO transfers
//! - [`memory`]: in-memory blob store for deterministic tests
//! - [`error`]: session failure modes

pub mod blob;
pub mod cursor;
pub mod error;
pub mod machine;
pub mod memory;
pub mod session;

pub use blob::{BlobSink, BlobStore};
pub use cursor::ByteCursor;
pub use error::SessionError;
pub use machine::ProtocolState;
pub use session::Session;
