use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidDescriptor(String),
    /// The signature text does not follow the generic signature grammar.
    InvalidSignature {
        signature: String,
        offset: usize,
        reason: &'static str,
    },
    /// More structures were closed than opened, or a walk ended with open
    /// structures.
    UnbalancedSignature {
        signature: String,
        offset: Option<usize>,
    },
}

impl Error {
    pub(crate) fn invalid_signature(signature: &str, offset: usize, reason: &'static str) -> Self {
        Error::InvalidSignature {
            signature: signature.to_string(),
            offset,
            reason,
        }
    }

    pub(crate) fn unbalanced(signature: &str, offset: Option<usize>) -> Self {
        Error::UnbalancedSignature {
            signature: signature.to_string(),
            offset,
        }
    }

    pub fn is_unbalanced(&self) -> bool {
        matches!(self, Error::UnbalancedSignature { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDescriptor(desc) => write!(f, "invalid descriptor: {desc}"),
            Error::InvalidSignature {
                signature,
                offset,
                reason,
            } => write!(f, "invalid signature `{signature}` at offset {offset}: {reason}"),
            Error::UnbalancedSignature {
                signature,
                offset: Some(offset),
            } => write!(f, "unbalanced signature levels in `{signature}` at offset {offset}"),
            Error::UnbalancedSignature {
                signature,
                offset: None,
            } => write!(f, "unbalanced signature levels in `{signature}`"),
        }
    }
}

impl std::error::Error for Error {}
