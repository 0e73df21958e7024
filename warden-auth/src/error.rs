use std::fmt::Display;
use std::path::PathBuf;

use strum::Display as StrumDisplay;
use thiserror::Error;
use tracing_error::SpanTrace;
use warden_types::error::{ApiError, StatusCode};

use crate::{sign::SigningMethod, store::RevocationError};

/// Which of the two PEM files a key loading failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum KeyRole {
    #[strum(serialize = "private")]
    Private,
    #[strum(serialize = "public")]
    Public,
}

#[derive(Error, Debug)]
pub enum ErrorType {
    #[error("`{0}` is not supported by the signature backend")]
    UnsupportedAlgorithm(SigningMethod),
    #[error("a symmetric key is required for `{0}`")]
    MissingHmacKey(SigningMethod),
    #[error("private and public key files are required for `{0}`")]
    MissingKeyPair(SigningMethod),
    #[error("token duration must be positive")]
    InvalidDuration,
    #[error("a token header name is required")]
    MissingHeader,
    #[error("failed to read the {role} key at {path:?}")]
    ReadKey {
        role: KeyRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse the {role} key at {path:?}")]
    ParseKey {
        role: KeyRole,
        path: PathBuf,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    #[error("there is no token in the `{0}` header")]
    TokenNotFound(String),
    #[error("token has expired")]
    Expired,
    #[error("token algorithm does not match the configured signing method")]
    Algorithm,
    #[error("token signature is invalid")]
    Signature,
    #[error("token is malformed")]
    Malformed(#[source] jsonwebtoken::errors::Error),
    #[error("token id claim is missing or malformed")]
    TokenIdClaim,
    #[error("issued-at claim is missing or malformed")]
    IssuedAtClaim,
    #[error("{0}")]
    Revocation(#[from] RevocationError),
}

#[derive(Error, Debug)]
pub struct Error {
    pub variant: ErrorType,
    pub span_trace: SpanTrace,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.variant, self.span_trace)
    }
}

impl From<ErrorType> for Error {
    fn from(err: ErrorType) -> Self {
        Self {
            variant: err,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<RevocationError> for Error {
    fn from(err: RevocationError) -> Self {
        ErrorType::from(err).into()
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        let variant = match err.kind() {
            ErrorKind::ExpiredSignature => ErrorType::Expired,
            ErrorKind::InvalidSignature => ErrorType::Signature,
            ErrorKind::InvalidAlgorithm => ErrorType::Algorithm,
            _ => ErrorType::Malformed(err),
        };
        variant.into()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status_code = match err.variant {
            ErrorType::UnsupportedAlgorithm(_)
            | ErrorType::MissingHmacKey(_)
            | ErrorType::MissingKeyPair(_)
            | ErrorType::InvalidDuration
            | ErrorType::MissingHeader
            | ErrorType::ReadKey { .. }
            | ErrorType::ParseKey { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::TokenNotFound(_)
            | ErrorType::Expired
            | ErrorType::Algorithm
            | ErrorType::Signature
            | ErrorType::Malformed(_)
            | ErrorType::TokenIdClaim
            | ErrorType::IssuedAtClaim
            | ErrorType::Revocation(_) => StatusCode::UNAUTHORIZED,
        };

        ApiError {
            error: err.variant.into(),
            status_code,
            span_trace: Some(err.span_trace),
        }
    }
}
