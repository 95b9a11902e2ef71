use std::fmt;

use thiserror::Error;

use crate::registry::RegistryError;

/// The part of a class whose signature or descriptor could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    ClassSignature,
    RecordComponent { name: String, descriptor: String },
    Field { name: String, descriptor: String },
    Method { name: String, descriptor: String },
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::ClassSignature => f.write_str("class signature"),
            Member::RecordComponent { name, descriptor } => {
                write!(f, "record component {name}:{descriptor}")
            }
            Member::Field { name, descriptor } => write!(f, "field {name}:{descriptor}"),
            Member::Method { name, descriptor } => write!(f, "method {name}{descriptor}"),
        }
    }
}

/// Why a record could not be fixed. The class is left untouched in every case.
#[derive(Debug, Error)]
pub enum RecordFixError {
    #[error("malformed signature on {member} of {class}: {source}")]
    MalformedSignature {
        class: String,
        member: Member,
        #[source]
        source: nova_classfile::Error,
    },
    #[error("invalid descriptor on {member} of {class}: {source}")]
    InvalidDescriptor {
        class: String,
        member: Member,
        #[source]
        source: nova_classfile::Error,
    },
    #[error("unable to find information for type {bound} (bound of type variable {variable} in {class})")]
    UnresolvableBound {
        class: String,
        variable: String,
        bound: String,
    },
    #[error("class registry unavailable while resolving {bound} for {class}: {source}")]
    RegistryUnavailable {
        class: String,
        variable: String,
        bound: String,
        #[source]
        source: RegistryError,
    },
}

impl RecordFixError {
    /// Internal name of the class that failed.
    pub fn class_name(&self) -> &str {
        match self {
            RecordFixError::MalformedSignature { class, .. }
            | RecordFixError::InvalidDescriptor { class, .. }
            | RecordFixError::UnresolvableBound { class, .. }
            | RecordFixError::RegistryUnavailable { class, .. } => class,
        }
    }
}
