//! # Error Handling
//!
//! Error type shared by every stage of the extension. Hook handlers convert
//! it into a gRPC [`tonic::Status`] at the service boundary.
//!
//! Most failures inside a translation cycle are per-item and are logged and
//! skipped by the caller; only the variants that abort a hook reach
//! [`From<Error> for tonic::Status`].

/// Custom result type for extension operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the gateway JWT extension
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors (startup settings and invalid generated config)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A resource or proto payload could not be decoded
    #[error("Decode error: {context}: {message}")]
    Decode { context: String, message: String },

    /// A URL could not be parsed or has no usable host
    #[error("Invalid URL '{url}': {message}")]
    UrlParse { url: String, message: String },

    /// OIDC discovery request failed
    #[error("Discovery failed for issuer '{issuer}': {message}")]
    Discovery {
        issuer: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Network transport errors (gRPC server bind and serve)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a new decode error
    pub fn decode<C: Into<String>, M: ToString>(context: C, message: M) -> Self {
        Self::Decode { context: context.into(), message: message.to_string() }
    }

    /// Create a new URL parse error
    pub fn url_parse<U: Into<String>, M: ToString>(url: U, message: M) -> Self {
        Self::UrlParse { url: url.into(), message: message.to_string() }
    }

    /// Create a discovery error without an underlying HTTP error
    pub fn discovery<I: Into<String>, M: Into<String>>(issuer: I, message: M) -> Self {
        Self::Discovery { issuer: issuer.into(), message: message.into(), source: None }
    }

    /// Create a discovery error from a failed HTTP exchange
    pub fn discovery_http<I: Into<String>>(issuer: I, source: reqwest::Error) -> Self {
        Self::Discovery { issuer: issuer.into(), message: source.to_string(), source: Some(source) }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the error aborts the hook that raised it.
    ///
    /// Decode and URL errors are recovered by skipping the offending item.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Decode { .. } | Self::UrlParse { .. })
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Self::UrlParse { url: String::new(), message: error.to_string() }
    }
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        fields.sort();

        Self::config(format!("Validation failed: {}", fields.join("; ")))
    }
}

impl From<Error> for tonic::Status {
    fn from(error: Error) -> Self {
        tonic::Status::internal(error.to_string())
    }
}
