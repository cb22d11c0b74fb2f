use uuid::Uuid;

use crate::gateway::LlmGateway;
use crate::provider::ChatHandle;

pub const NOT_INITIALIZED: &str = "Error: Chat session not initialized.";
pub const STREAM_FAILED_NOTE: &str = "\n\n*Error: Failed to get response.*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), role, content: content.into() }
    }
}

/// The assistant's conversation and its local transcript. Independent of the
/// wizard; only one message is in flight at a time.
pub struct ChatAssistant {
    session: Option<ChatHandle>,
    transcript: Vec<ChatMessage>,
}

impl ChatAssistant {
    /// Opens the chat once. A failure leaves the assistant unavailable; it is
    /// not retried.
    pub async fn start(gateway: &LlmGateway) -> Self {
        let session = match gateway.create_chat_session().await {
            Ok(handle) => {
                tracing::info!(chat = %handle.id, model = %handle.model, "chat session created");
                Some(handle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to create chat session");
                None
            }
        };
        Self { session, transcript: Vec::new() }
    }

    pub fn is_available(&self) -> bool {
        self.session.is_some()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Sends one user message and streams the reply into a model message.
    /// `on_update` is called with the reply after every appended fragment.
    pub async fn send<F>(&mut self, gateway: &LlmGateway, message: &str, mut on_update: F)
    where
        F: FnMut(&ChatMessage),
    {
        let Some(chat) = self.session.as_ref() else {
            let notice = ChatMessage::new(Role::Model, NOT_INITIALIZED);
            on_update(&notice);
            self.transcript.push(notice);
            return;
        };

        self.transcript.push(ChatMessage::new(Role::User, message));
        self.transcript.push(ChatMessage::new(Role::Model, ""));
        let idx = self.transcript.len() - 1;

        let mut stream = match gateway.stream_chat_reply(chat, message).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                let reply = &mut self.transcript[idx];
                reply.content.push_str(STREAM_FAILED_NOTE);
                on_update(reply);
                return;
            }
        };

        while let Some(item) = stream.recv().await {
            let reply = &mut self.transcript[idx];
            match item {
                Ok(fragment) => {
                    reply.content.push_str(&fragment);
                    on_update(reply);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "chat stream failed");
                    reply.content.push_str(STREAM_FAILED_NOTE);
                    on_update(reply);
                    return;
                }
            }
        }
    }
}
