//! The five-step wizard. A [`Session`] value is threaded through
//! [`Workflow::apply`]; every transition returns a new value and pipeline
//! failures land in the session instead of being returned.

use thiserror::Error;

use crate::gateway::LlmGateway;
use crate::parse::ProductCopy;
use crate::validate;

pub const MSG_BRAND_EXTRACTION: &str = "Analyzing your brand voice... this can take up to a minute.";
pub const MSG_BRAND_SYNTHESIS: &str = "Synthesizing your brand profile...";
pub const MSG_PRODUCT_ANALYSIS: &str = "Analyzing your product page...";
pub const MSG_GENERATION: &str = "Generating your optimized product copy...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    StoreUrlInput,
    BrandProfileDisplay,
    ProductUrlInput,
    ProductAnalysisDisplay,
    ResultsDisplay,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading(String),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Nothing worth keeping yet; start from the first step.
    StartOver,
    /// Clear the error and offer the current step again.
    TryAgain,
}

impl Recovery {
    pub fn label(self) -> &'static str {
        match self {
            Recovery::StartOver => "Start Over",
            Recovery::TryAgain => "Try Again",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub step: Step,
    pub store_url: String,
    pub brand_profile: String,
    pub product_url: String,
    pub product_analysis: String,
    pub product_copy: Option<ProductCopy>,
    pub status: Status,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            step: Step::StoreUrlInput,
            store_url: String::new(),
            brand_profile: String::new(),
            product_url: String::new(),
            product_analysis: String::new(),
            product_copy: None,
            status: Status::Idle,
        }
    }
}

impl Session {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// What dismissing the current error will do, if there is one.
    pub fn recovery(&self) -> Option<Recovery> {
        self.error()?;
        Some(if self.step < Step::BrandProfileDisplay { Recovery::StartOver } else { Recovery::TryAgain })
    }

    fn loading(mut self, message: &str) -> Self {
        self.status = Status::Loading(message.to_string());
        self
    }

    fn failed(mut self, err: impl ToString) -> Self {
        let message = err.to_string();
        tracing::warn!(step = ?self.step, error = %message, "step failed");
        self.status = Status::Failed(message);
        self
    }

    fn advance(mut self, step: Step) -> Self {
        tracing::info!(from = ?self.step, to = ?step, "step changed");
        self.step = step;
        self.status = Status::Idle;
        self
    }

    fn clear_product(mut self) -> Self {
        self.product_url.clear();
        self.product_analysis.clear();
        self.product_copy = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SubmitStoreUrl(String),
    AcceptProfile,
    /// Discard everything and return to the first step.
    Restart,
    SubmitProductUrl(String),
    ConfirmAnalysis,
    GoBack,
    OptimizeAnother,
    Regenerate,
    AnalyzeNewBrand,
    DismissError,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SubmitStoreUrl(_) => "submit store URL",
            Action::AcceptProfile => "accept profile",
            Action::Restart => "restart",
            Action::SubmitProductUrl(_) => "submit product URL",
            Action::ConfirmAnalysis => "confirm analysis",
            Action::GoBack => "go back",
            Action::OptimizeAnother => "optimize another product",
            Action::Regenerate => "regenerate",
            Action::AnalyzeNewBrand => "analyze new brand",
            Action::DismissError => "dismiss error",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {action} at {step:?} ({status})")]
pub struct InvalidTransition {
    pub step: Step,
    pub action: &'static str,
    pub status: &'static str,
}

pub struct Workflow<'a> {
    gateway: &'a LlmGateway,
}

impl<'a> Workflow<'a> {
    pub fn new(gateway: &'a LlmGateway) -> Self {
        Self { gateway }
    }

    /// Applies one user action. `observe` sees every intermediate session
    /// (the loading states) before the final one is returned.
    pub async fn apply<F>(&self, session: Session, action: Action, mut observe: F) -> Result<Session, InvalidTransition>
    where
        F: FnMut(&Session),
    {
        let reject = |session: &Session, action: &Action, status: &'static str| InvalidTransition {
            step: session.step,
            action: action.name(),
            status,
        };

        if session.is_loading() {
            return Err(reject(&session, &action, "loading"));
        }
        if session.error().is_some() {
            return match action {
                Action::DismissError => Ok(recover(session)),
                other => Err(reject(&session, &other, "failed")),
            };
        }

        use Action::*;
        use Step::*;
        match (session.step, action) {
            (StoreUrlInput, SubmitStoreUrl(raw)) => Ok(self.build_brand_profile(session, &raw, &mut observe).await),
            (BrandProfileDisplay, AcceptProfile) => Ok(session.advance(ProductUrlInput)),
            (BrandProfileDisplay | ProductUrlInput | ProductAnalysisDisplay | ResultsDisplay, Restart) => {
                tracing::info!("session reset");
                Ok(Session::default())
            }
            (ProductUrlInput, SubmitProductUrl(raw)) => Ok(self.analyze_product(session, &raw, &mut observe).await),
            (ProductAnalysisDisplay, ConfirmAnalysis) | (ResultsDisplay, Regenerate) => {
                Ok(self.generate_copy(session, &mut observe).await)
            }
            (ProductAnalysisDisplay, GoBack) => Ok(session.advance(ProductUrlInput)),
            (ResultsDisplay, OptimizeAnother) => Ok(session.clear_product().advance(ProductUrlInput)),
            (ResultsDisplay, AnalyzeNewBrand) => Ok(session.clear_product().advance(BrandProfileDisplay)),
            (_, action) => Err(reject(&session, &action, "idle")),
        }
    }

    async fn build_brand_profile(&self, session: Session, raw: &str, observe: &mut impl FnMut(&Session)) -> Session {
        let url = match validate::normalize_url(raw) {
            Ok(url) => url,
            Err(e) => return session.failed(e),
        };
        let session = Session { store_url: url, ..session }.loading(MSG_BRAND_EXTRACTION);
        observe(&session);

        let raw_report = match self.gateway.extract_brand_voice(&session.store_url).await {
            Ok(report) => report,
            Err(e) => return session.failed(e),
        };

        let session = session.loading(MSG_BRAND_SYNTHESIS);
        observe(&session);
        match self.gateway.synthesize_brand_profile(&raw_report).await {
            Ok(profile) => Session { brand_profile: profile, ..session }.advance(Step::BrandProfileDisplay),
            Err(e) => session.failed(e),
        }
    }

    async fn analyze_product(&self, session: Session, raw: &str, observe: &mut impl FnMut(&Session)) -> Session {
        let url = match validate::normalize_url(raw) {
            Ok(url) => url,
            Err(e) => return session.failed(e),
        };
        let session = Session { product_url: url, ..session }.loading(MSG_PRODUCT_ANALYSIS);
        observe(&session);

        match self.gateway.analyze_product(&session.product_url).await {
            Ok(analysis) => Session { product_analysis: analysis, ..session }.advance(Step::ProductAnalysisDisplay),
            Err(e) => session.failed(e),
        }
    }

    /// Used for the first generation and for regeneration. A failed
    /// regeneration keeps the previous copy on screen.
    async fn generate_copy(&self, session: Session, observe: &mut impl FnMut(&Session)) -> Session {
        let session = session.loading(MSG_GENERATION);
        observe(&session);

        let result = self
            .gateway
            .generate_product_copy(&session.brand_profile, &session.product_analysis, &session.product_url)
            .await;
        match result {
            Ok(copy) => Session { product_copy: Some(copy), ..session }.advance(Step::ResultsDisplay),
            Err(e) => session.failed(e),
        }
    }
}

/// Errors before a brand profile exists restart the wizard; later ones only
/// clear the error so no finished step has to be repeated.
fn recover(session: Session) -> Session {
    match session.recovery() {
        Some(Recovery::StartOver) => Session::default(),
        _ => Session { status: Status::Idle, ..session },
    }
}
