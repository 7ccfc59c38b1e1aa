//! Display text for chat failures.
//!
//! This is the single place where [`ChatError`] values become user-facing
//! text, for both the terminal UI and the one-shot command.

use crate::core::error::{ChatError, CompletionError};

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a raw API body as plain text: JSON is pretty-printed and indented
/// under a one-line summary, anything else is passed through trimmed.
pub fn format_api_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            return match extract_error_summary(&json_value) {
                Some(summary) => format!("{summary}\n{}", indent(&pretty_json)),
                None => indent(&pretty_json),
            };
        }
    }

    trimmed.to_string()
}

fn completion_notice(err: &CompletionError) -> String {
    match err {
        CompletionError::Authentication(detail) => format!(
            "Authentication failed. Check GROQ_API_KEY or run 'vers3chat auth'.\n{}",
            format_api_body(detail)
        ),
        CompletionError::RateLimited(detail) => {
            format!("Rate limited by the API.\n{}", format_api_body(detail))
        }
        CompletionError::Api { status, body } => {
            format!("API Error ({status}):\n{}", format_api_body(body))
        }
        CompletionError::Transport(detail) => format!("Network error: {detail}"),
        CompletionError::Stream(detail) => {
            format!("Stream error:\n{}", format_api_body(detail))
        }
    }
}

/// Text shown to the user for a failed turn or command.
pub fn notice_for(err: &ChatError) -> String {
    match err {
        ChatError::Completion(err) => completion_notice(err),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;

    #[test]
    fn json_bodies_are_prettified_with_summary() {
        let raw = r#"{"error":{"message":"model   overloaded","type":"invalid_request_error"}}"#;
        let expected = r#"model overloaded
  {
    "error": {
      "message": "model   overloaded",
      "type": "invalid_request_error"
    }
  }"#;
        assert_eq!(format_api_body(raw), expected);
    }

    #[test]
    fn json_without_summary_is_indented() {
        assert_eq!(
            format_api_body(r#"{"status":"failed"}"#),
            "  {\n    \"status\": \"failed\"\n  }"
        );
    }

    #[test]
    fn bodies_carry_no_markdown_fences() {
        assert_eq!(format_api_body("<error>bad</error>"), "<error>bad</error>");
        assert_eq!(format_api_body("  api failure \n"), "api failure");
        assert_eq!(format_api_body("  "), "<empty>");

        let rate_limited = notice_for(&ChatError::Completion(CompletionError::RateLimited(
            r#"{"error":{"message":"slow down"}}"#.to_string(),
        )));
        assert!(!rate_limited.contains("```"));
        assert!(rate_limited.starts_with("Rate limited by the API.\nslow down\n  {"));
    }

    #[test]
    fn completion_errors_get_context() {
        let auth = notice_for(&ChatError::Completion(CompletionError::Authentication(
            r#"{"error":{"message":"Invalid API Key"}}"#.to_string(),
        )));
        assert!(auth.starts_with("Authentication failed."));
        assert!(auth.contains("Invalid API Key"));

        let api = notice_for(&ChatError::Completion(CompletionError::Api {
            status: 503,
            body: "unavailable".to_string(),
        }));
        assert_eq!(api, "API Error (503):\nunavailable");
    }

    #[test]
    fn other_errors_use_display() {
        assert_eq!(
            notice_for(&ChatError::Validation(ValidationError::EmptyMessage)),
            "Message is empty"
        );
        assert_eq!(
            notice_for(&ChatError::Busy),
            "A response is still streaming"
        );
    }
}
