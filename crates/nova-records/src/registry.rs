use std::collections::HashMap;
use std::sync::Arc;

use nova_classfile::ClassStub;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the fixer needs to know about a class referenced from a bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassInfo {
    pub is_interface: bool,
}

impl ClassInfo {
    pub const CLASS: ClassInfo = ClassInfo {
        is_interface: false,
    };
    pub const INTERFACE: ClassInfo = ClassInfo { is_interface: true };
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The backing lookup service failed; the class may or may not exist.
    #[error("class registry unavailable: {0}")]
    Unavailable(String),
}

/// Resolves internal class names (`java/util/List`) to [`ClassInfo`].
///
/// Implementations must only return `Ok(None)` when the class is genuinely not
/// resolvable (for example, it is missing from the classpath). Transient
/// failures are reported as [`RegistryError`].
///
/// Fix passes only read from the registry; if it is populated concurrently the
/// caller must finish populating it before fixing classes.
pub trait ClassRegistry {
    fn lookup(&self, internal_name: &str) -> Result<Option<ClassInfo>, RegistryError>;
}

impl<R: ClassRegistry + ?Sized> ClassRegistry for &R {
    fn lookup(&self, internal_name: &str) -> Result<Option<ClassInfo>, RegistryError> {
        (**self).lookup(internal_name)
    }
}

impl<R: ClassRegistry + ?Sized> ClassRegistry for Arc<R> {
    fn lookup(&self, internal_name: &str) -> Result<Option<ClassInfo>, RegistryError> {
        (**self).lookup(internal_name)
    }
}

const MINIMAL_JDK_CLASSES: &[&str] = &[
    "java/lang/Object",
    "java/lang/Number",
    "java/lang/String",
    "java/lang/Integer",
    "java/lang/Long",
    "java/lang/Double",
    "java/lang/Boolean",
    "java/lang/Enum",
    "java/lang/Record",
    "java/lang/Throwable",
    "java/lang/Exception",
    "java/lang/RuntimeException",
    "java/lang/Class",
    "java/util/Optional",
];

const MINIMAL_JDK_INTERFACES: &[&str] = &[
    "java/lang/Comparable",
    "java/lang/CharSequence",
    "java/lang/Iterable",
    "java/lang/Runnable",
    "java/lang/AutoCloseable",
    "java/io/Serializable",
    "java/util/Collection",
    "java/util/List",
    "java/util/Set",
    "java/util/Map",
    "java/util/Queue",
    "java/util/Deque",
    "java/util/Iterator",
    "java/util/function/Function",
    "java/util/function/BiFunction",
    "java/util/function/Supplier",
    "java/util/function/Consumer",
    "java/util/function/Predicate",
];

/// A [`ClassRegistry`] backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryClassRegistry {
    classes: HashMap<String, ClassInfo>,
}

impl InMemoryClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that knows the handful of JDK types most commonly found in
    /// record signatures.
    pub fn with_minimal_jdk() -> Self {
        let mut registry = Self::new();
        for name in MINIMAL_JDK_CLASSES {
            registry.insert(*name, ClassInfo::CLASS);
        }
        for name in MINIMAL_JDK_INTERFACES {
            registry.insert(*name, ClassInfo::INTERFACE);
        }
        registry
    }

    pub fn insert(&mut self, internal_name: impl Into<String>, info: ClassInfo) {
        self.classes.insert(internal_name.into(), info);
    }

    pub fn insert_stub(&mut self, stub: &ClassStub) {
        self.insert(
            stub.internal_name.clone(),
            ClassInfo {
                is_interface: stub.is_interface(),
            },
        );
    }

    pub fn contains(&self, internal_name: &str) -> bool {
        self.classes.contains_key(internal_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassRegistry for InMemoryClassRegistry {
    fn lookup(&self, internal_name: &str) -> Result<Option<ClassInfo>, RegistryError> {
        Ok(self.classes.get(internal_name).copied())
    }
}

impl<'a> Extend<&'a ClassStub> for InMemoryClassRegistry {
    fn extend<I: IntoIterator<Item = &'a ClassStub>>(&mut self, iter: I) {
        for stub in iter {
            self.insert_stub(stub);
        }
    }
}

impl<'a> FromIterator<&'a ClassStub> for InMemoryClassRegistry {
    fn from_iter<I: IntoIterator<Item = &'a ClassStub>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}
