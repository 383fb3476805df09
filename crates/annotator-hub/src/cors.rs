use hyper::HeaderMap;

/// Permissive CORS so the injected toolbar script (served from the page's own
/// origin) can reach the hub freely.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("Access-Control-Allow-Origin", "*".parse().unwrap());
    headers.insert("Access-Control-Allow-Methods", "GET, POST, OPTIONS".parse().unwrap());
    headers.insert("Access-Control-Allow-Headers", "Content-Type, Mcp-Session-Id".parse().unwrap());
    headers.insert("Access-Control-Max-Age", "86400".parse().unwrap());
}
