//! Error taxonomy shared by the session registry, RPC engine, and MCP tool
//! surface. Every variant here is a hub-internal error; none of them ever
//! cross the MCP boundary directly — the tool surface renders them to prose
//! (see `HubError::as_tool_text`).

use thiserror::Error;

use crate::ids::SessionId;

/// The taxonomy of error kinds a tool invocation, an RPC call, or a registry
/// lookup can terminate in.
#[derive(Debug, Clone, Error)]
pub enum HubError {
    #[error("No browser sessions connected. Add the annotator script to your webpage.")]
    NoBrowserConnected,

    #[error("Multiple sessions available. Specify sessionId. Available: {}", join_ids(.available))]
    SessionAmbiguous { available: Vec<SessionId> },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("transport closed")]
    TransportClosed,

    #[error("timeout after {deadline_ms}ms")]
    Timeout { deadline_ms: u64 },

    #[error("{message}")]
    ProcedureError { message: String },

    #[error("{message}")]
    InvalidArguments { message: String },

    #[error("{message}")]
    IoError { message: String },
}

fn join_ids(ids: &[SessionId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

impl HubError {
    /// The taxonomy tag this error belongs to (`§7`), independent of its
    /// rendered message.
    pub fn kind(&self) -> &'static str {
        match self {
            HubError::NoBrowserConnected => "no-browser-connected",
            HubError::SessionAmbiguous { .. } => "session-ambiguous",
            HubError::SessionNotFound { .. } => "session-not-found",
            HubError::TransportClosed => "transport-closed",
            HubError::Timeout { .. } => "timeout",
            HubError::ProcedureError { .. } => "procedure-error",
            HubError::InvalidArguments { .. } => "invalid-arguments",
            HubError::IoError { .. } => "io-error",
        }
    }

    /// True for errors a caller can reasonably retry (a fresh connect, a
    /// fresh call) as opposed to ones that are permanent for this input.
    pub fn is_retriable(&self) -> bool {
        matches!(self, HubError::TransportClosed)
    }

    /// Render this error the way a resolution failure is surfaced to an MCP
    /// caller: plain text, no `Error:` prefix, naming the cause (`§4.5`).
    pub fn as_resolution_text(&self) -> String {
        self.to_string()
    }

    /// Render this error the way an RPC/procedure failure is surfaced to an
    /// MCP caller: text beginning with `Error:` (`§7`).
    pub fn as_tool_error_text(&self) -> String {
        format!("Error: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_browser_connected_matches_literal_wording() {
        let err = HubError::NoBrowserConnected;
        assert_eq!(
            err.as_resolution_text(),
            "No browser sessions connected. Add the annotator script to your webpage."
        );
    }

    #[test]
    fn ambiguous_enumerates_ids() {
        let a = SessionId::new();
        let b = SessionId::new();
        let err = HubError::SessionAmbiguous { available: vec![a, b] };
        let text = err.as_resolution_text();
        assert!(text.starts_with("Multiple sessions available. Specify sessionId. Available: "));
        assert!(text.contains(&a.to_string()));
        assert!(text.contains(&b.to_string()));
    }

    #[test]
    fn tool_error_text_is_prefixed() {
        let err = HubError::Timeout { deadline_ms: 10_000 };
        assert!(err.as_tool_error_text().starts_with("Error:"));
        assert!(err.as_tool_error_text().contains("timeout"));
    }

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(HubError::TransportClosed.kind(), "transport-closed");
        assert_eq!(HubError::NoBrowserConnected.kind(), "no-browser-connected");
    }
}
