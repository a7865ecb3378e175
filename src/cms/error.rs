use reqwest::StatusCode;
use thiserror::Error;

/// A failed CMS fetch
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("{message}: {source}")]
    Request {
        source: reqwest::Error,
        message: String,
    },
    #[error("CMS returned {status_code}: {message}")]
    Status {
        status_code: StatusCode,
        message: String,
    },
    #[error("{message}: {source}")]
    Decode {
        source: serde_json::Error,
        message: String,
    },
    #[error("invalid CMS configuration: {0}")]
    Config(String),
}

type CmsResult<T> = Result<T, CmsError>;

/// Attaches a message to lower-level errors
pub trait IntoCmsResult<T> {
    fn into_cms(self, message: &str) -> CmsResult<T>;
}

impl<T> IntoCmsResult<T> for Result<T, reqwest::Error> {
    fn into_cms(self, message: &str) -> CmsResult<T> {
        self.map_err(|e| CmsError::Request {
            source: e,
            message: message.to_string(),
        })
    }
}

impl<T> IntoCmsResult<T> for Result<T, serde_json::Error> {
    fn into_cms(self, message: &str) -> CmsResult<T> {
        self.map_err(|e| CmsError::Decode {
            source: e,
            message: message.to_string(),
        })
    }
}
