/// Base URL of the knowledge-graph API server.
pub const API_BASE_URL: &str = "http://localhost:8000";

/// Per-request deadline. Requests still in flight after this are abandoned.
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

pub fn endpoint(path: &str) -> String {
    format!("{API_BASE_URL}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_path() {
        assert_eq!(endpoint("/graph"), "http://localhost:8000/graph");
        assert_eq!(
            endpoint("/entities/abc-1"),
            "http://localhost:8000/entities/abc-1"
        );
    }
}
