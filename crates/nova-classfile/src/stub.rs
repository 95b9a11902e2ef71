use serde::{Deserialize, Serialize};

use crate::access::{ACC_FINAL, ACC_INTERFACE, ACC_STATIC};
use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};
use crate::error::Result;

/// Internal name of the implicit superclass of every record.
pub const RECORD_BASE: &str = "java/lang/Record";

/// Internal name of the root of the class hierarchy.
pub const OBJECT: &str = "java/lang/Object";

/// Structural view of a class as handed over by a classfile reader.
///
/// Signatures are kept as raw text; they are only parsed on demand, because the
/// records of interest here typically carry partial or stripped signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStub {
    pub internal_name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldStub>,
    #[serde(default)]
    pub methods: Vec<MethodStub>,
    /// `None` when the class has no `Record` attribute at all.
    #[serde(default)]
    pub record_components: Option<Vec<RecordComponentStub>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordComponentStub {
    pub name: String,
    pub descriptor: String,
    #[serde(default)]
    pub signature: Option<String>,
}

impl ClassStub {
    pub fn new(internal_name: impl Into<String>, super_class: Option<&str>) -> Self {
        Self {
            internal_name: internal_name.into(),
            access_flags: 0,
            super_class: super_class.map(str::to_string),
            interfaces: Vec::new(),
            signature: None,
            fields: Vec::new(),
            methods: Vec::new(),
            record_components: None,
        }
    }

    /// A class is a record iff its direct superclass is `java/lang/Record`.
    pub fn is_record(&self) -> bool {
        self.super_class.as_deref() == Some(RECORD_BASE)
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    /// `true` if the class has at least one record component.
    pub fn has_record_components(&self) -> bool {
        self.record_components
            .as_ref()
            .is_some_and(|components| !components.is_empty())
    }
}

impl FieldStub {
    pub fn new(access_flags: u16, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access_flags,
            name: name.into(),
            descriptor: descriptor.into(),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Final instance fields; visibility is deliberately not considered.
    pub fn is_final_instance(&self) -> bool {
        self.access_flags & (ACC_FINAL | ACC_STATIC) == ACC_FINAL
    }

    pub fn parsed_descriptor(&self) -> Result<FieldType> {
        parse_field_descriptor(&self.descriptor)
    }
}

impl MethodStub {
    pub fn new(access_flags: u16, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access_flags,
            name: name.into(),
            descriptor: descriptor.into(),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn parsed_descriptor(&self) -> Result<MethodDescriptor> {
        parse_method_descriptor(&self.descriptor)
    }
}

impl RecordComponentStub {
    pub fn parsed_descriptor(&self) -> Result<FieldType> {
        parse_field_descriptor(&self.descriptor)
    }
}

impl From<&FieldStub> for RecordComponentStub {
    fn from(field: &FieldStub) -> Self {
        RecordComponentStub {
            name: field.name.clone(),
            descriptor: field.descriptor.clone(),
            signature: field.signature.clone(),
        }
    }
}
