//! Shared decode step for every API call

use crate::core::error::{ApiError, FALLBACK_MESSAGE, Result};
use log::warn;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Reads the body of `response` and hands it to [`decode_body`].
pub async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = body_or_empty(status, response.bytes().await)?;
    decode_body(status, &body)
}

/// A body that can't be read on an error status is treated as empty, so the
/// caller still sees the server's status.
pub fn body_or_empty<B: Default>(status: StatusCode, read: reqwest::Result<B>) -> Result<B> {
    match read {
        Ok(body) => Ok(body),
        Err(e) if !status.is_success() => {
            warn!("could not read {status} response body: {e}");
            Ok(B::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Parses `body` as JSON (falling back to `{}`), turns non-2xx statuses into
/// [`ApiError::Server`] and decodes everything else into `T`.
pub fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    let data = serde_json::from_slice::<Value>(body).unwrap_or_else(|_| Value::Object(Map::new()));

    if !status.is_success() {
        let message = error_message(&data);
        warn!("request failed with {status}: {message}");
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_value(data)?)
}

/// `detail`, then `message`, then the fallback. Empty strings don't count.
pub fn error_message(data: &Value) -> String {
    non_empty_str(data.get("detail"))
        .or_else(|| validation_messages(data.get("detail")))
        .or_else(|| non_empty_str(data.get("message")))
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned())
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

// 422 bodies carry `detail: [{"loc": [...], "msg": "...", ...}]`
fn validation_messages(value: Option<&Value>) -> Option<String> {
    let messages: Vec<&str> = value?
        .as_array()?
        .iter()
        .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug)]
    struct Item {
        id: String,
    }

    #[test]
    fn test_not_found_uses_detail() {
        let err = decode_body::<Item>(StatusCode::NOT_FOUND, br#"{"detail": "not found"}"#).unwrap_err();
        assert_eq!(err.to_string(), "not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unparsable_error_body_uses_fallback() {
        let err = decode_body::<Item>(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>").unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_message_used_when_detail_missing() {
        let err = decode_body::<Item>(StatusCode::BAD_REQUEST, br#"{"message": "bad input"}"#).unwrap_err();
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn test_empty_detail_falls_through_to_message() {
        let data = json!({"detail": "", "message": "try later"});
        assert_eq!(error_message(&data), "try later");
    }

    #[test]
    fn test_validation_detail_is_joined() {
        let data = json!({"detail": [
            {"loc": ["body", "topic"], "msg": "field required"},
            {"loc": ["body", "category"], "msg": "field required"}
        ]});
        assert_eq!(error_message(&data), "field required; field required");
    }

    #[test]
    fn test_success_returns_parsed_body() {
        let item: Item = decode_body(StatusCode::OK, br#"{"id": "1", "extra": true}"#).unwrap();
        assert_eq!(item.id, "1");
    }

    #[test]
    fn test_success_with_wrong_shape_is_decode_error() {
        let err = decode_body::<Item>(StatusCode::OK, br#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    async fn transport_error() -> reqwest::Error {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        reqwest::get(format!("http://{addr}")).await.unwrap_err()
    }

    #[tokio::test]
    async fn test_unreadable_error_body_keeps_status() {
        let body: Vec<u8> = body_or_empty(StatusCode::BAD_GATEWAY, Err(transport_error().await)).unwrap();
        let err = decode_body::<Item>(StatusCode::BAD_GATEWAY, &body).unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreadable_success_body_is_network_error() {
        let err = body_or_empty::<Vec<u8>>(StatusCode::OK, Err(transport_error().await)).unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_success_with_empty_body_is_decode_error() {
        let err = decode_body::<Item>(StatusCode::CREATED, b"").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
