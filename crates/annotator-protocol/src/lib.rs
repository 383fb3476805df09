//! Wire types, tool metadata, and the error taxonomy shared by every other
//! `annotator-*` crate. This crate has no async runtime dependency: it is
//! pure data plus `Display`/`serde` impls, imported by the transport, RPC,
//! session, and hub crates alike.

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod jsonrpc;
pub mod schema;
pub mod tool;

pub use envelope::{Envelope, RpcErrorPayload};
pub use error::HubError;
pub use ids::SessionId;
pub use schema::{JsonSchema, ToolSchema};
pub use tool::{
    CallToolResult, HasAnnotations, HasBaseMetadata, HasDescription, HasInputSchema, HasOutputSchema,
    HasToolMeta, Tool, ToolDefinition, ToolResult,
};

/// Common result type across the annotator crates.
pub type HubResult<T> = Result<T, HubError>;
