use thiserror::Error;

/// Why the next article could not be loaded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Custom articles unlock after enough words have been studied.
    #[error("custom articles are not unlocked yet")]
    Locked,

    /// Every studied word has been used up.
    #[error("no words left to build an article from")]
    WordsExhausted,

    #[error("no generic articles are available")]
    NoTemplates,

    #[error("server error (HTTP {status}) {code}: {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// User-facing grouping of fetch failures; each gets its own guidance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureCategory {
    LockedContent,
    ExhaustedWords,
    NoTemplates,
    Generic,
    Network,
}

impl FetchError {
    /// Map an error `code` from the service's JSON error body.
    pub fn from_code(status: u16, code: &str, message: &str) -> Self {
        match code {
            "ARTICLES_NOT_UNLOCKED" => FetchError::Locked,
            "NO_WORDS_AVAILABLE" => FetchError::WordsExhausted,
            "NO_GENERIC_ARTICLES" => FetchError::NoTemplates,
            _ => FetchError::Server {
                status,
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            FetchError::Locked => FailureCategory::LockedContent,
            FetchError::WordsExhausted => FailureCategory::ExhaustedWords,
            FetchError::NoTemplates => FailureCategory::NoTemplates,
            FetchError::Server { .. } | FetchError::InvalidResponse(_) => FailureCategory::Generic,
            FetchError::Network(_) => FailureCategory::Network,
        }
    }
}

/// Failure of a fire-and-forget progress or completion call. Only logged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected {endpoint} (HTTP {status}): {message}")]
    Rejected {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    #[error("unknown article {0}")]
    UnknownArticle(i64),
}
