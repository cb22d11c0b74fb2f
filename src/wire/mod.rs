use serde::{Deserialize, Serialize};

/// ========================================
/// Provider-neutral request
/// ========================================

/// One fully composed generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Let the model retrieve live web pages while answering.
    pub web_search: bool,
    pub thinking_budget: Option<u32>,
}

/// ========================================
/// Gemini REST shapes
/// ========================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Some("user".into()), parts: vec![Part::text(text)] }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Some("model".into()), parts: vec![Part::text(text)] }
    }

    /// Concatenated answer text, leaving out thought summaries.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing)]
    pub thought: bool,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), thought: false }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub thinking_config: ThinkingConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn from_request(req: &GenerateRequest) -> Self {
        Self {
            contents: vec![Content::user(req.prompt.clone())],
            system_instruction: None,
            tools: if req.web_search {
                vec![Tool { google_search: GoogleSearch::default() }]
            } else {
                vec![]
            },
            generation_config: req
                .thinking_budget
                .map(|b| GenerationConfig { thinking_config: ThinkingConfig { thinking_budget: b } }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, empty when the model produced none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(Content::text)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// ========================================
/// Server-sent events
/// ========================================

/// Splits a byte stream into `data:` payloads. Chunks may end mid-line, so
/// incomplete lines are buffered until their newline arrives.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(data) = data_payload(&line) {
                out.push(data);
            }
        }
        out
    }

    /// Whatever is left once the stream closed without a trailing newline.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buf);
        data_payload(&rest)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() || data == "[DONE]" {
        None
    } else {
        Some(data.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_tools_and_thinking_only_when_asked() {
        let req = GenerateRequest {
            model: "gemini-2.5-pro".into(),
            prompt: "hi".into(),
            web_search: true,
            thinking_budget: Some(32_768),
        };
        let body = serde_json::to_value(GenerateContentRequest::from_request(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "tools": [{"google_search": {}}],
                "generationConfig": {"thinkingConfig": {"thinkingBudget": 32768}}
            })
        );

        let plain = GenerateRequest { web_search: false, thinking_budget: None, ..req };
        let body = serde_json::to_value(GenerateContentRequest::from_request(&plain)).unwrap();
        assert_eq!(body, json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]}));
    }

    #[test]
    fn response_text_skips_thoughts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"text":"planning...","thought":true},
            {"text":"Hello "},
            {"text":"world"}
        ]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text(), "Hello world");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let resp: GenerateContentResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(resp.text(), "");
    }

    #[test]
    fn error_body_keeps_message_and_status() {
        let raw = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let body: ApiErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.error.message, "API key not valid.");
        assert_eq!(body.error.status, "INVALID_ARGUMENT");
    }

    #[test]
    fn sse_lines_split_across_chunks() {
        let mut dec = SseDecoder::default();
        assert!(dec.push(b"data: {\"a\"").is_empty());
        assert_eq!(dec.push(b":1}\r\n\r\ndata: {\"b\":2}\n"), vec!["{\"a\":1}", "{\"b\":2}"]);
        assert!(dec.push(b": keep-alive\n").is_empty());
        dec.push(b"data: tail");
        assert_eq!(dec.finish().as_deref(), Some("tail"));
    }
}
