#![forbid(unsafe_code)]

pub mod access;
mod descriptor;
mod error;
pub mod signature;
mod stub;

pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::signature::{
    validate_signature, MemberPosition, SignatureEvent, SignatureKind, SignatureWalker,
    SignatureWriter, WalkContext, Wildcard,
};
pub use crate::stub::{ClassStub, FieldStub, MethodStub, RecordComponentStub, OBJECT, RECORD_BASE};
