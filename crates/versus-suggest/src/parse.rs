use serde_json::Value;

use versus_core::CollaboratorError;

/// Parse the model's text into JSON. Fenced or chatty output is tolerated by falling
/// back to the outermost `{...}` span.
pub fn parse_llm_output(raw: &str) -> Result<Value, CollaboratorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CollaboratorError::EmptyResponse);
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let json_str = extract_json_object(trimmed).ok_or_else(|| CollaboratorError::Malformed {
        message: "no JSON object in response".to_string(),
    })?;

    serde_json::from_str(json_str).map_err(|e| CollaboratorError::Malformed {
        message: e.to_string(),
    })
}

/// Extract the JSON object substring from raw LLM output.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_json_parses() {
        assert_eq!(parse_llm_output(r#"{"items": []}"#), Ok(json!({ "items": [] })));
    }

    #[test]
    fn fenced_json_parses() {
        let raw = "Here you go:\n```json\n{\"summary\": \"ok\"}\n```\n";
        assert_eq!(parse_llm_output(raw), Ok(json!({ "summary": "ok" })));
    }

    #[test]
    fn blank_output_is_empty_response() {
        assert_eq!(parse_llm_output("  \n"), Err(CollaboratorError::EmptyResponse));
    }

    #[test]
    fn prose_is_malformed() {
        assert!(matches!(
            parse_llm_output("I cannot compare those."),
            Err(CollaboratorError::Malformed { .. })
        ));
        assert!(matches!(
            parse_llm_output("} backwards {"),
            Err(CollaboratorError::Malformed { .. })
        ));
    }
}
