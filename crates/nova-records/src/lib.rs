//! Repair of Java record classes whose `Record` and `Signature` attributes
//! were stripped by a bytecode optimizer.
//!
//! [`RecordFixer`] synthesizes the record component list from the component
//! fields and rebuilds the class signature so that every type variable used by
//! a member is declared, inferring bounds from member descriptors and a
//! [`ClassRegistry`].

#![forbid(unsafe_code)]

mod batch;
mod builder;
mod components;
mod config;
mod error;
mod fixer;
mod inference;
mod registry;

pub use crate::batch::{fix_all, BatchReport};
pub use crate::builder::build_class_signature;
pub use crate::components::{component_fields, synthesize_components};
pub use crate::config::{ConfigError, RecordFixConfig};
pub use crate::error::{Member, RecordFixError};
pub use crate::fixer::{fix_record, FixOutcome, RecordFixer};
pub use crate::inference::{
    declared_type_parameters, Bound, MemberContext, TypeVariableBindings, TypeVariableCollector,
};
pub use crate::registry::{ClassInfo, ClassRegistry, InMemoryClassRegistry, RegistryError};
