use thiserror::Error;

/// Raw failure from the transport boundary. Never shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return ProviderError::Decode(e.to_string());
        }
        match e.status() {
            Some(status) => ProviderError::Status { code: status.as_u16(), message: e.to_string() },
            None => ProviderError::Transport(e.to_string()),
        }
    }
}

/// User-facing failure of one gateway operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("The API key is invalid. Please contact the administrator to ensure it is configured correctly.")]
    InvalidCredential,
    #[error("The service is currently experiencing high traffic. Please try again in a few moments.")]
    RateLimited,
    #[error("The AI could not access the provided URL. Please ensure the URL is correct, publicly accessible, and not blocked by a firewall or login page.")]
    InaccessibleUrl,
    #[error("A network error occurred. Please check your internet connection and try again.")]
    Network,
    #[error("The AI returned an empty response while {context}.")]
    EmptyResponse { context: &'static str },
    #[error("The AI returned an unexpected format. Please try generating the copy again.")]
    MalformedOutput,
    #[error("An unexpected error occurred while {context}: {message}")]
    Unexpected { context: &'static str, message: String },
}

impl GatewayError {
    /// Maps a provider failure onto the user-facing categories. The most
    /// specific signal is checked first.
    pub fn classify(err: &ProviderError, context: &'static str) -> Self {
        let text = match err {
            ProviderError::Status { message, .. } => message.to_lowercase(),
            ProviderError::Transport(message) | ProviderError::Decode(message) => message.to_lowercase(),
        };
        let code = match err {
            ProviderError::Status { code, .. } => Some(*code),
            _ => None,
        };

        if text.contains("api key not valid") {
            GatewayError::InvalidCredential
        } else if code == Some(429) || text.contains("rate limit") {
            GatewayError::RateLimited
        } else if code == Some(400) || text.contains("url") {
            GatewayError::InaccessibleUrl
        } else if matches!(err, ProviderError::Transport(_))
            || text.contains("fetch failed")
            || text.contains("network")
        {
            GatewayError::Network
        } else {
            let message = match err {
                ProviderError::Status { message, .. } => message.clone(),
                other => other.to_string(),
            };
            GatewayError::Unexpected { context, message }
        }
    }
}

/// A user-supplied URL that failed normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL cannot be empty.")]
    Empty,
    #[error("Please enter a valid URL starting with http:// or https://.")]
    UnsupportedScheme,
    #[error("The URL format is invalid. Please check for typos.")]
    InvalidFormat,
    #[error("The URL appears to be incomplete or invalid.")]
    IncompleteHostname,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing section: {0}")]
    MissingSection(&'static str),
}

impl From<ParseError> for GatewayError {
    fn from(_: ParseError) -> Self {
        GatewayError::MalformedOutput
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, message: &str) -> ProviderError {
        ProviderError::Status { code, message: message.to_string() }
    }

    #[test]
    fn invalid_key_wins_over_bad_request() {
        let err = status(400, "API key not valid. Please pass a valid API key.");
        assert_eq!(GatewayError::classify(&err, "analyzing product details"), GatewayError::InvalidCredential);
    }

    #[test]
    fn rate_limit_by_status_or_text() {
        assert_eq!(GatewayError::classify(&status(429, "Resource exhausted"), "x"), GatewayError::RateLimited);
        assert_eq!(
            GatewayError::classify(&status(500, "rate limit exceeded for url"), "x"),
            GatewayError::RateLimited
        );
    }

    #[test]
    fn bad_request_and_url_mentions_map_to_inaccessible_url() {
        assert_eq!(GatewayError::classify(&status(400, "Request contains an invalid argument."), "x"), GatewayError::InaccessibleUrl);
        assert_eq!(GatewayError::classify(&status(500, "could not fetch URL"), "x"), GatewayError::InaccessibleUrl);
    }

    #[test]
    fn transport_failures_are_network_errors() {
        let err = ProviderError::Transport("error sending request".into());
        assert_eq!(GatewayError::classify(&err, "x"), GatewayError::Network);
        let err = status(503, "fetch failed");
        assert_eq!(GatewayError::classify(&err, "x"), GatewayError::Network);
    }

    #[test]
    fn anything_else_surfaces_the_message() {
        let err = status(500, "Internal error encountered.");
        let mapped = GatewayError::classify(&err, "synthesizing brand profile");
        assert_eq!(
            mapped.to_string(),
            "An unexpected error occurred while synthesizing brand profile: Internal error encountered."
        );
    }

    #[test]
    fn empty_response_message_names_the_operation() {
        let err = GatewayError::EmptyResponse { context: "analyzing product details" };
        assert!(err.to_string().starts_with("The AI returned an empty response"));
    }
}
