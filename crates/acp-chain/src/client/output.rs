use serde_json::Value;
use std::fmt;

/// The run envelope layout this client negotiates with agent servers. Replies in any
/// other layout are surfaced as [`RunOutput::Unrecognized`] rather than guessed at.
pub const ACP_ENVELOPE_VERSION: &str = "acp-run/v1";

/// The text of a run reply, tagged with the envelope shape it was found in.
///
/// Decoded once at the client boundary so callers never inspect the envelope themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    /// `output[0].parts[0].content`
    Output(String),
    /// `messages[0].parts[0].content`
    Messages(String),
    /// Neither shape matched; the whole envelope rendered as JSON text
    Unrecognized(String),
}

impl RunOutput {
    pub fn from_envelope(envelope: &Value) -> Self {
        if let Some(text) = first_text(envelope, "output") {
            return RunOutput::Output(text.to_string());
        }
        if let Some(text) = first_text(envelope, "messages") {
            return RunOutput::Messages(text.to_string());
        }
        RunOutput::Unrecognized(envelope.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            RunOutput::Output(text) | RunOutput::Messages(text) | RunOutput::Unrecognized(text) => {
                text
            }
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            RunOutput::Output(_) => "output",
            RunOutput::Messages(_) => "messages",
            RunOutput::Unrecognized(_) => "unrecognized",
        }
    }

    /// True when the text came from anything other than the primary `output` list
    pub fn is_fallback(&self) -> bool {
        !matches!(self, RunOutput::Output(_))
    }
}

impl fmt::Display for RunOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Parse a raw response body. Bodies that are not JSON become a JSON string, so an
/// unrecognized envelope never renders as empty text.
pub fn parse_envelope(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn first_text<'a>(envelope: &'a Value, key: &str) -> Option<&'a str> {
    envelope
        .get(key)?
        .as_array()?
        .first()?
        .get("parts")?
        .as_array()?
        .first()?
        .get("content")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_output_shape() {
        let envelope = json!({
            "agent_name": "health_agent",
            "status": "completed",
            "output": [{
                "role": "agent/health_agent",
                "parts": [
                    {
                        "content_type": "text/plain",
                        "content": "Yes, physical therapy is typically recommended."
                    },
                    {"content_type": "text/plain", "content": "ignored"}
                ]
            }]
        });
        let output = RunOutput::from_envelope(&envelope);
        assert_eq!(
            output,
            RunOutput::Output("Yes, physical therapy is typically recommended.".to_string())
        );
        assert!(!output.is_fallback());
    }

    #[test]
    fn test_messages_fallback_keeps_text_unchanged() {
        let text = "Waiting period: 2 months.\n\n  Hospital cover applies.";
        let envelope = json!({"messages": [{"parts": [{"content": text}]}]});
        let output = RunOutput::from_envelope(&envelope);
        assert_eq!(output.shape(), "messages");
        assert_eq!(output.text(), text);
    }

    #[test]
    fn test_empty_output_falls_through_to_messages() {
        let envelope = json!({
            "output": [],
            "messages": [{"parts": [{"content": "from messages"}]}]
        });
        assert_eq!(
            RunOutput::from_envelope(&envelope),
            RunOutput::Messages("from messages".to_string())
        );
    }

    #[test]
    fn test_output_without_text_part_falls_through() {
        let envelope = json!({
            "output": [{"parts": [{"content_url": "https://example.com/report.pdf"}]}],
            "messages": [{"parts": [{"content": "summary"}]}]
        });
        assert_eq!(RunOutput::from_envelope(&envelope).text(), "summary");
    }

    #[test]
    fn test_unrecognized_envelope_is_stringified() {
        let envelope = json!({"result": "something else"});
        let output = RunOutput::from_envelope(&envelope);
        assert_eq!(output.shape(), "unrecognized");
        assert_eq!(output.text(), r#"{"result":"something else"}"#);
    }

    #[test]
    fn test_unrecognized_body_is_never_empty() {
        let decode = |body: &str| RunOutput::from_envelope(&parse_envelope(body));
        assert!(!decode("").text().is_empty());
        assert!(!decode("{}").text().is_empty());
        assert_eq!(decode("plain reply").text(), r#""plain reply""#);
    }

    #[test]
    fn test_empty_content_is_still_primary() {
        let envelope = json!({"output": [{"parts": [{"content": ""}]}]});
        assert_eq!(RunOutput::from_envelope(&envelope), RunOutput::Output(String::new()));
    }
}
