use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::sync::mpsc;

use super::{ChatHandle, FragmentStream, Provider};
use crate::errors::ProviderError;
use crate::wire::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerateRequest, Part, SseDecoder,
};

/// Google Gemini over the public REST API.
pub struct Gemini {
    client: Client,
    api_base: String,
    api_key: String,
}

impl Gemini {
    pub fn new(api_base: &str, api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_base: api_base.trim_end_matches('/').to_string(), api_key })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.api_base, model, method)
    }

    async fn post(&self, url: &str, body: &GenerateContentRequest) -> Result<Response, ProviderError> {
        tracing::debug!(%url, tools = body.tools.len(), "gemini request");
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(error_from_response(resp).await)
        }
    }
}

async fn error_from_response(resp: Response) -> ProviderError {
    let code = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    tracing::debug!(code, body = %text, "gemini error response");
    let message = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) if !body.error.message.is_empty() => body.error.message,
        Ok(body) => body.error.status,
        Err(_) => text,
    };
    ProviderError::Status { code, message }
}

fn decode_chunk(payload: &str) -> Result<String, ProviderError> {
    serde_json::from_str::<GenerateContentResponse>(payload)
        .map(|r| r.text())
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

#[async_trait]
impl Provider for Gemini {
    async fn generate(&self, req: &GenerateRequest) -> Result<String, ProviderError> {
        let url = self.endpoint(&req.model, "generateContent");
        let body = GenerateContentRequest::from_request(req);
        let resp = self.post(&url, &body).await?;
        let text = resp.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(parsed.text())
    }

    async fn open_chat(&self, model: &str, system_instruction: &str) -> Result<ChatHandle, ProviderError> {
        // The REST API is stateless; the history travels with every request.
        Ok(ChatHandle::new(model, system_instruction))
    }

    async fn stream_chat(&self, chat: &ChatHandle, message: &str) -> Result<FragmentStream, ProviderError> {
        let url = format!("{}?alt=sse", self.endpoint(&chat.model, "streamGenerateContent"));
        let mut contents = chat.history();
        contents.push(Content::user(message));
        let body = GenerateContentRequest {
            contents,
            system_instruction: Some(Content { role: None, parts: vec![Part::text(&chat.system_instruction)] }),
            tools: vec![],
            generation_config: None,
        };
        let resp = self.post(&url, &body).await?;

        let (tx, rx) = mpsc::channel(32);
        let chat = chat.clone();
        let message = message.to_string();
        tokio::spawn(async move {
            let mut stream = resp.bytes_stream();
            let mut decoder = SseDecoder::default();
            let mut reply = String::new();
            while let Some(item) = stream.next().await {
                let bytes = match item {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx.send(Err(e.into())).await;
                        return;
                    }
                };
                for payload in decoder.push(&bytes) {
                    match decode_chunk(&payload) {
                        Ok(text) if text.is_empty() => {}
                        Ok(text) => {
                            reply.push_str(&text);
                            if tx.send(Ok(text)).await.is_err() {
                                // Receiver dropped; nobody is listening anymore.
                                return;
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                            return;
                        }
                    }
                }
            }
            if let Some(payload) = decoder.finish() {
                match decode_chunk(&payload) {
                    Ok(text) if !text.is_empty() => {
                        reply.push_str(&text);
                        let _ = tx.send(Ok(text)).await;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }
            chat.record_turn(&message, &reply);
            tracing::debug!(chat = %chat.id, bytes = reply.len(), "chat reply complete");
        });
        Ok(rx)
    }
}
