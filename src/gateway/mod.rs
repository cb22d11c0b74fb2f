use std::fmt;

use crate::config::Config;
use crate::errors::GatewayError;
use crate::parse::{self, ProductCopy};
use crate::prompt;
use crate::provider::{ChatHandle, DynProvider, FragmentStream};
use crate::wire::GenerateRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    BrandVoiceExtraction,
    BrandVoiceSynthesis,
    ProductAnalysis,
    ProductDescription,
}

impl Operation {
    /// Phrase used in user-facing error messages ("... while {context}").
    pub fn context(self) -> &'static str {
        match self {
            Operation::BrandVoiceExtraction => "extracting brand voice",
            Operation::BrandVoiceSynthesis => "synthesizing brand profile",
            Operation::ProductAnalysis => "analyzing product details",
            Operation::ProductDescription => "generating product description",
        }
    }

    /// Short name used for artifact files and log fields.
    pub fn stage(self) -> &'static str {
        match self {
            Operation::BrandVoiceExtraction => "brand-extraction",
            Operation::BrandVoiceSynthesis => "brand-synthesis",
            Operation::ProductAnalysis => "product-analysis",
            Operation::ProductDescription => "product-description",
        }
    }

    pub fn profile(self) -> GenerationProfile {
        match self {
            Operation::BrandVoiceExtraction => DEEP_RESEARCH,
            Operation::BrandVoiceSynthesis => FAST_REWRITE,
            Operation::ProductAnalysis => DEEP_RESEARCH,
            Operation::ProductDescription => DEEP_WRITING,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stage())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Analysis,
    Synthesis,
    Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thinking {
    Default,
    Max,
}

/// Generation policy of one operation, resolved against the configured models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationProfile {
    pub tier: ModelTier,
    pub web_search: bool,
    pub thinking: Thinking,
}

pub const DEEP_RESEARCH: GenerationProfile =
    GenerationProfile { tier: ModelTier::Analysis, web_search: true, thinking: Thinking::Max };
pub const FAST_REWRITE: GenerationProfile =
    GenerationProfile { tier: ModelTier::Synthesis, web_search: false, thinking: Thinking::Default };
pub const DEEP_WRITING: GenerationProfile =
    GenerationProfile { tier: ModelTier::Generation, web_search: false, thinking: Thinking::Max };

/// Hook called with every completed generation exchange.
pub trait ExchangeSink: Send + Sync {
    fn record(&self, op: Operation, prompt: &str, response: &str);
}

/// The only path from the wizard and the chat to the model provider. Every
/// failure leaving this type is a [`GatewayError`].
pub struct LlmGateway {
    provider: DynProvider,
    cfg: Config,
    sink: Option<Box<dyn ExchangeSink>>,
}

impl LlmGateway {
    pub fn new(provider: DynProvider, cfg: Config) -> Self {
        Self { provider, cfg, sink: None }
    }

    pub fn with_sink(mut self, sink: Box<dyn ExchangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    fn request(&self, op: Operation, prompt: String) -> GenerateRequest {
        let profile = op.profile();
        let model = match profile.tier {
            ModelTier::Analysis => &self.cfg.models.analysis,
            ModelTier::Synthesis => &self.cfg.models.synthesis,
            ModelTier::Generation => &self.cfg.models.generation,
        };
        GenerateRequest {
            model: model.clone(),
            prompt,
            web_search: profile.web_search,
            thinking_budget: match profile.thinking {
                Thinking::Max => Some(self.cfg.thinking_budget),
                Thinking::Default => None,
            },
        }
    }

    async fn run(&self, op: Operation, prompt: String) -> Result<String, GatewayError> {
        let req = self.request(op, prompt);
        tracing::info!(stage = %op, model = %req.model, web_search = req.web_search, "generation started");
        let text = self.provider.generate(&req).await.map_err(|e| {
            tracing::warn!(stage = %op, error = %e, "generation failed");
            GatewayError::classify(&e, op.context())
        })?;
        if let Some(sink) = &self.sink {
            sink.record(op, &req.prompt, &text);
        }
        if text.trim().is_empty() {
            tracing::warn!(stage = %op, "empty response");
            return Err(GatewayError::EmptyResponse { context: op.context() });
        }
        tracing::info!(stage = %op, chars = text.len(), "generation finished");
        Ok(text)
    }

    pub async fn extract_brand_voice(&self, store_url: &str) -> Result<String, GatewayError> {
        let prompt = prompt::user_prompt_extraction(prompt::brand_voice_extraction(), store_url);
        self.run(Operation::BrandVoiceExtraction, prompt).await
    }

    pub async fn synthesize_brand_profile(&self, raw_report: &str) -> Result<String, GatewayError> {
        let prompt = prompt::user_prompt_synthesis(prompt::brand_voice_synthesis(), raw_report);
        self.run(Operation::BrandVoiceSynthesis, prompt).await
    }

    pub async fn analyze_product(&self, product_url: &str) -> Result<String, GatewayError> {
        let prompt = prompt::user_prompt_analysis(prompt::product_analysis(), product_url);
        self.run(Operation::ProductAnalysis, prompt).await
    }

    pub async fn generate_product_description(
        &self,
        brand_profile: &str,
        product_analysis: &str,
        product_url: &str,
    ) -> Result<String, GatewayError> {
        let prompt = prompt::user_prompt_generation(
            prompt::product_description_generation(),
            brand_profile,
            product_analysis,
            product_url,
        );
        self.run(Operation::ProductDescription, prompt).await
    }

    /// Generation followed by parsing; a response missing any section is a failure.
    pub async fn generate_product_copy(
        &self,
        brand_profile: &str,
        product_analysis: &str,
        product_url: &str,
    ) -> Result<ProductCopy, GatewayError> {
        let text = self.generate_product_description(brand_profile, product_analysis, product_url).await?;
        parse::parse_product_copy(&text).map_err(|e| {
            tracing::warn!(error = %e, "generation output did not match the expected layout");
            GatewayError::from(e)
        })
    }

    pub async fn create_chat_session(&self) -> Result<ChatHandle, GatewayError> {
        self.provider
            .open_chat(&self.cfg.models.chat, prompt::chat_system_instruction())
            .await
            .map_err(|e| GatewayError::classify(&e, "creating chat session"))
    }

    pub async fn stream_chat_reply(&self, chat: &ChatHandle, message: &str) -> Result<FragmentStream, GatewayError> {
        self.provider
            .stream_chat(chat, message)
            .await
            .map_err(|e| GatewayError::classify(&e, "streaming chat response"))
    }
}
