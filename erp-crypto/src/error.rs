use thiserror::Error;

/**
    Errors raised by certificate classification and the crypto primitives.

    Every operation is all-or-nothing: a failure never leaves partial output
    behind, and none of these conditions is transient, so callers should not
    retry.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    // ── Certificates ──────────────────────────────────────────────────
    #[error("malformed certificate: {0}")]
    CertificateFormat(String),

    // ── AEAD / ECIES ──────────────────────────────────────────────────
    #[error("AES-GCM authentication tag mismatch")]
    Authentication,
    #[error("malformed encrypted envelope: {0}")]
    EncryptionFormat(String),

    // ── Keys / parameters ─────────────────────────────────────────────
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("unsupported parameter: {0}")]
    UnsupportedParameter(String),

    // ── Operations ────────────────────────────────────────────────────
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error("crypto provider failure: {0}")]
    CryptoProvider(String),
}

impl From<der::Error> for CryptoError {
    fn from(e: der::Error) -> Self {
        Self::CertificateFormat(e.to_string())
    }
}

/// Type alias for results that may return a [`CryptoError`].
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}
