//! Error types for the swap client

/// An error returned by the swap client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapClientError {
    /// A user input failed validation
    #[error("validation error: {0}")]
    Validation(String),
    /// A swap quote could not be fetched
    #[error("quote error: {0}")]
    QuoteFetch(String),
    /// The inbound vault metadata could not be resolved
    #[error("chain metadata error: {0}")]
    Metadata(String),
    /// The source chain is halted or has trading paused
    #[error("chain halted: {0}")]
    ChainHalted(String),
    /// The token approval failed
    #[error("approval error: {0}")]
    Approval(String),
    /// The deposit transaction failed
    #[error("deposit error: {0}")]
    Deposit(String),
    /// The settlement status could not be fetched
    #[error("polling error: {0}")]
    Polling(String),
    /// An http request failed
    #[error("http error: {0}")]
    Http(String),
    /// A value could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
    /// The wallet or its provider returned an error
    #[error("wallet error: {0}")]
    Wallet(String),
}

impl SwapClientError {
    /// Create a new validation error
    #[allow(clippy::needless_pass_by_value)]
    pub fn validation<T: ToString>(e: T) -> Self {
        SwapClientError::Validation(e.to_string())
    }

    /// Create a new quote fetch error
    #[allow(clippy::needless_pass_by_value)]
    pub fn quote_fetch<T: ToString>(e: T) -> Self {
        SwapClientError::QuoteFetch(e.to_string())
    }

    /// Create a new metadata error
    #[allow(clippy::needless_pass_by_value)]
    pub fn metadata<T: ToString>(e: T) -> Self {
        SwapClientError::Metadata(e.to_string())
    }

    /// Create a new chain halted error
    #[allow(clippy::needless_pass_by_value)]
    pub fn chain_halted<T: ToString>(e: T) -> Self {
        SwapClientError::ChainHalted(e.to_string())
    }

    /// Create a new approval error
    #[allow(clippy::needless_pass_by_value)]
    pub fn approval<T: ToString>(e: T) -> Self {
        SwapClientError::Approval(e.to_string())
    }

    /// Create a new deposit error
    #[allow(clippy::needless_pass_by_value)]
    pub fn deposit<T: ToString>(e: T) -> Self {
        SwapClientError::Deposit(e.to_string())
    }

    /// Create a new polling error
    #[allow(clippy::needless_pass_by_value)]
    pub fn polling<T: ToString>(e: T) -> Self {
        SwapClientError::Polling(e.to_string())
    }

    /// Create a new http error
    #[allow(clippy::needless_pass_by_value)]
    pub fn http<T: ToString>(e: T) -> Self {
        SwapClientError::Http(e.to_string())
    }

    /// Create a new parse error
    #[allow(clippy::needless_pass_by_value)]
    pub fn parse<T: ToString>(e: T) -> Self {
        SwapClientError::Parse(e.to_string())
    }

    /// Create a new wallet error
    #[allow(clippy::needless_pass_by_value)]
    pub fn wallet<T: ToString>(e: T) -> Self {
        SwapClientError::Wallet(e.to_string())
    }

    /// The underlying message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            SwapClientError::Validation(m)
            | SwapClientError::QuoteFetch(m)
            | SwapClientError::Metadata(m)
            | SwapClientError::ChainHalted(m)
            | SwapClientError::Approval(m)
            | SwapClientError::Deposit(m)
            | SwapClientError::Polling(m)
            | SwapClientError::Http(m)
            | SwapClientError::Parse(m)
            | SwapClientError::Wallet(m) => m,
        }
    }
}

impl From<reqwest::Error> for SwapClientError {
    fn from(e: reqwest::Error) -> Self {
        SwapClientError::http(e)
    }
}
