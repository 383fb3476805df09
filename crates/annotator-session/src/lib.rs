//! The Session Registry: process-wide `session-id -> {transport, rpc-peer,
//! metadata}` with auto-select-single resolution semantics.

pub mod metadata;
pub mod registry;

pub use metadata::{SessionMetadata, SessionSummary};
pub use registry::{SessionEntry, SessionRegistry};
