use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use super::encoder::{BridgeRecord, NULL_VALUE};
use super::extract::FetchRequest;
use super::lookup::find_key;
use crate::config::Settings;
use crate::error::Result;

/// Key that bypasses JSON parsing and stores the raw body
pub const RAW_BODY_KEY: &str = "0";

/// HTTP client resolving fetch requests into bridge records
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.user_agent,
            Duration::from_secs(settings.fetch_timeout_secs),
        )
    }

    /// Fetch one request. Failures degrade to a `NULL` record.
    pub async fn resolve(&self, request: &FetchRequest) -> BridgeRecord {
        let value = self
            .fetch_value(request)
            .await
            .unwrap_or_else(|| NULL_VALUE.to_string());
        tracing::debug!(destination = %request.destination, value = %value, "resolved fetch");
        BridgeRecord::new(&request.destination, value)
    }

    async fn fetch_value(&self, request: &FetchRequest) -> Option<String> {
        let response = match self.client.get(&request.url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %request.url, "fetch failed: {e}");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(url = %request.url, status = %response.status(), "fetch rejected");
            return None;
        }

        match response.text().await {
            Ok(body) => resolve_body(&request.json_key, &body),
            Err(e) => {
                tracing::warn!(url = %request.url, "failed to read body: {e}");
                None
            }
        }
    }
}

/// Value for a successful response body.
///
/// The raw-body key returns the trimmed body, a body that is not JSON falls
/// back to the trimmed body, and a JSON document without the key yields
/// `None`.
pub fn resolve_body(json_key: &str, body: &str) -> Option<String> {
    if json_key == RAW_BODY_KEY {
        return Some(single_line(body));
    }
    match serde_json::from_str::<Value>(body) {
        Ok(doc) => find_key(&doc, json_key).map(render_value),
        Err(_) => Some(single_line(body)),
    }
}

/// Text the runtime has always received for a value: Python-style
/// `True`/`False`, `[1, 2]` and `{'k': 'v'}`, with strings written raw at the
/// top level.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => single_line(s),
        Value::Null => NULL_VALUE.to_string(),
        other => single_line(&display_value(other)),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), display_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Single quotes unless the text holds one and no double quote
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Trimmed, with line breaks flattened so the record stays on one line
fn single_line(s: &str) -> String {
    s.trim().replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::stub::{self, Route};

    #[test]
    fn raw_key_trims_body() {
        assert_eq!(resolve_body("0", "  42  \n"), Some("42".to_string()));
    }

    #[test]
    fn raw_key_skips_json_parsing() {
        assert_eq!(
            resolve_body("0", r#"{"0": "x"}"#),
            Some(r#"{"0": "x"}"#.to_string())
        );
    }

    #[test]
    fn nested_json_key() {
        assert_eq!(
            resolve_body("price", r#"{"data":{"price":"100"}}"#),
            Some("100".to_string())
        );
    }

    #[test]
    fn scalar_values_render_as_text() {
        assert_eq!(resolve_body("n", r#"{"n": 1.5}"#), Some("1.5".to_string()));
        assert_eq!(resolve_body("ok", r#"{"ok": true}"#), Some("True".to_string()));
        assert_eq!(resolve_body("ok", r#"{"ok": false}"#), Some("False".to_string()));
        assert_eq!(
            resolve_body("s", r#"{"s": "  padded  "}"#),
            Some("padded".to_string())
        );
    }

    #[test]
    fn composite_values_render_like_the_runtime_expects() {
        assert_eq!(
            resolve_body("xs", r#"{"xs": [1, 2]}"#),
            Some("[1, 2]".to_string())
        );
        assert_eq!(
            resolve_body("p", r#"{"p": {"a": "x", "b": [true, null]}}"#),
            Some("{'a': 'x', 'b': [True, None]}".to_string())
        );
        assert_eq!(
            resolve_body("q", r#"{"q": ["it's"]}"#),
            Some(r#"["it's"]"#.to_string())
        );
    }

    #[test]
    fn invalid_json_falls_back_to_body() {
        assert_eq!(
            resolve_body("price", " plain text "),
            Some("plain text".to_string())
        );
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(resolve_body("price", r#"{"other": 1}"#), None);
    }

    #[test]
    fn multiline_values_are_flattened() {
        assert_eq!(resolve_body("0", "a\nb\r\nc"), Some("a b  c".to_string()));
    }

    #[tokio::test]
    async fn resolves_against_http_server() {
        let base = stub::serve(vec![
            Route::ok("/json", r#"{"data":{"price":"100"}}"#),
            Route::ok("/plain", "  42  "),
        ])
        .await;
        let fetcher = Fetcher::new("test-agent", Duration::from_secs(5)).unwrap();

        let json = FetchRequest {
            url: format!("{base}/json"),
            json_key: "price".to_string(),
            destination: "precio".to_string(),
        };
        assert_eq!(
            fetcher.resolve(&json).await,
            BridgeRecord::new("precio", "100")
        );

        let plain = FetchRequest {
            url: format!("{base}/plain"),
            json_key: "0".to_string(),
            destination: "n".to_string(),
        };
        assert_eq!(fetcher.resolve(&plain).await, BridgeRecord::new("n", "42"));
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let base = stub::serve(vec![]).await;
        let fetcher = Fetcher::new("RedSync-IDE/3.6", Duration::from_secs(5)).unwrap();
        let request = FetchRequest {
            url: format!("{base}{}", stub::ECHO_AGENT),
            json_key: "0".to_string(),
            destination: "ua".to_string(),
        };
        assert_eq!(fetcher.resolve(&request).await.value, "RedSync-IDE/3.6");
    }

    #[tokio::test]
    async fn non_200_is_null() {
        let base = stub::serve(vec![Route::status("/gone", 404, "{\"price\": 1}")]).await;
        let fetcher = Fetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let request = FetchRequest {
            url: format!("{base}/gone"),
            json_key: "price".to_string(),
            destination: "p".to_string(),
        };
        assert_eq!(fetcher.resolve(&request).await.value, NULL_VALUE);
    }

    #[tokio::test]
    async fn connection_error_is_null() {
        let fetcher = Fetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let request = FetchRequest {
            url: stub::refused_url().await,
            json_key: "price".to_string(),
            destination: "p".to_string(),
        };
        assert_eq!(fetcher.resolve(&request).await.value, NULL_VALUE);
    }

    #[tokio::test]
    async fn timeout_is_null() {
        let base = stub::serve(vec![Route::ok("/slow", "1").delayed(2_000)]).await;
        let fetcher = Fetcher::new("test-agent", Duration::from_millis(200)).unwrap();
        let request = FetchRequest {
            url: format!("{base}/slow"),
            json_key: "0".to_string(),
            destination: "s".to_string(),
        };
        assert_eq!(fetcher.resolve(&request).await.value, NULL_VALUE);
    }
}
