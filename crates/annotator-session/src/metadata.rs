use serde::Serialize;

/// The Session entity (`§3`): url/title as last reported by the browser,
/// plus the two monotonic-epoch timestamps the spec requires.
#[derive(Debug, Clone, Serialize)]
pub struct SessionMetadata {
    pub url: String,
    pub title: String,
    pub connected_at_ms: i64,
    pub last_activity_ms: i64,
}

impl SessionMetadata {
    pub fn new() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self { url: String::new(), title: String::new(), connected_at_ms: now, last_activity_ms: now }
    }

    pub fn touch(&mut self) {
        self.last_activity_ms = chrono::Utc::now().timestamp_millis();
    }

    pub fn update_page_context(&mut self, url: String, title: String) {
        self.url = url;
        self.title = title;
        self.touch();
    }
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A session as exposed to `list-sessions`/`GET /api/sessions`: the
/// metadata plus the id it is keyed under.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub url: String,
    pub title: String,
    #[serde(rename = "connectedAt")]
    pub connected_at_ms: i64,
    #[serde(rename = "lastActivity")]
    pub last_activity_ms: i64,
}
