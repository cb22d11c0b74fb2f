use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::ProviderError;
use crate::wire::{Content, GenerateRequest};

pub mod gemini;

/// Text fragments of one streamed reply, in arrival order. The channel closes
/// when the reply is complete; an `Err` item is terminal.
pub type FragmentStream = mpsc::Receiver<Result<String, ProviderError>>;

#[async_trait]
pub trait Provider: Send + Sync {
    /// One request/response exchange. The text may be empty.
    async fn generate(&self, req: &GenerateRequest) -> Result<String, ProviderError>;

    async fn open_chat(&self, model: &str, system_instruction: &str) -> Result<ChatHandle, ProviderError>;

    /// Sends `message` in the context of `chat`. Fails before the first
    /// fragment when the request itself is rejected.
    async fn stream_chat(&self, chat: &ChatHandle, message: &str) -> Result<FragmentStream, ProviderError>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config, api_key: String) -> Result<DynProvider> {
    let gemini = gemini::Gemini::new(&cfg.api_base, api_key, Duration::from_secs(cfg.timeout_secs))?;
    Ok(Box::new(gemini))
}

/// Conversation state of one chat. Cloning shares the same history.
#[derive(Debug, Clone)]
pub struct ChatHandle {
    pub id: Uuid,
    pub model: String,
    pub system_instruction: String,
    history: Arc<Mutex<Vec<Content>>>,
}

impl ChatHandle {
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            system_instruction: system_instruction.into(),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn history(&self) -> Vec<Content> {
        self.history.lock().clone()
    }

    /// Records a completed exchange. Failed exchanges are never recorded so the
    /// history keeps alternating user/model turns.
    pub fn record_turn(&self, user: &str, reply: &str) {
        let mut history = self.history.lock();
        history.push(Content::user(user));
        history.push(Content::model(reply));
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;

    type ChatScript = Result<Vec<Result<String, ProviderError>>, ProviderError>;

    /// In-memory provider replaying canned outcomes in order.
    #[derive(Default)]
    pub struct ScriptedProvider {
        generations: Mutex<VecDeque<Result<String, ProviderError>>>,
        chats: Mutex<VecDeque<ChatScript>>,
        open_error: Option<ProviderError>,
        pub requests: Arc<Mutex<Vec<GenerateRequest>>>,
        pub chat_messages: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedProvider {
        pub fn with_generations(items: Vec<Result<String, ProviderError>>) -> Self {
            Self { generations: Mutex::new(items.into()), ..Self::default() }
        }

        /// A provider whose chat sessions can never be opened.
        pub fn failing_open(err: ProviderError) -> Self {
            Self { open_error: Some(err), ..Self::default() }
        }

        pub fn push_chat(&self, script: ChatScript) {
            self.chats.lock().push_back(script);
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn generate(&self, req: &GenerateRequest) -> Result<String, ProviderError> {
            self.requests.lock().push(req.clone());
            self.generations
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Decode("script exhausted".into())))
        }

        async fn open_chat(&self, model: &str, system_instruction: &str) -> Result<ChatHandle, ProviderError> {
            match &self.open_error {
                Some(e) => Err(e.clone()),
                None => Ok(ChatHandle::new(model, system_instruction)),
            }
        }

        async fn stream_chat(&self, _chat: &ChatHandle, message: &str) -> Result<FragmentStream, ProviderError> {
            self.chat_messages.lock().push(message.to_string());
            let fragments = self
                .chats
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Decode("script exhausted".into())))?;
            let (tx, rx) = mpsc::channel(fragments.len().max(1));
            for f in fragments {
                tx.try_send(f).expect("channel sized to the script");
            }
            Ok(rx)
        }
    }
}
