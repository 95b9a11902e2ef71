use std::collections::HashSet;

use nova_classfile::access::make_private;
use nova_classfile::{ClassStub, RecordComponentStub, SignatureKind};

use crate::builder::build_class_signature;
use crate::components::synthesize_components;
use crate::config::RecordFixConfig;
use crate::error::{Member, RecordFixError};
use crate::inference::{
    declared_type_parameter_set, MemberContext, TypeVariableBindings, TypeVariableCollector,
};
use crate::registry::ClassRegistry;

/// What a fix pass changed on a class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixOutcome {
    pub is_record: bool,
    /// Number of record components that were synthesized.
    pub components_added: usize,
    /// The class signature that was written, if any.
    pub signature: Option<String>,
    /// Number of component fields whose visibility was reset to private.
    pub fields_made_private: usize,
}

impl FixOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.components_added == 0 && self.signature.is_none() && self.fields_made_private == 0
    }
}

/// Everything a pass wants to change, computed without touching the class.
#[derive(Debug, Default)]
struct FixPlan {
    components: Option<Vec<RecordComponentStub>>,
    signature: Option<String>,
    private_fields: Vec<usize>,
}

impl FixPlan {
    fn apply(self, class: &mut ClassStub) -> FixOutcome {
        let mut outcome = FixOutcome {
            is_record: true,
            ..FixOutcome::default()
        };

        for &index in &self.private_fields {
            let field = &mut class.fields[index];
            field.access_flags = make_private(field.access_flags);
        }
        outcome.fields_made_private = self.private_fields.len();

        if let Some(components) = self.components {
            tracing::debug!(
                target: "nova.records",
                class = %class.internal_name,
                components = components.len(),
                "synthesized record components"
            );
            outcome.components_added = components.len();
            class.record_components = Some(components);
        }

        if let Some(signature) = self.signature {
            tracing::debug!(
                target: "nova.records",
                class = %class.internal_name,
                old = ?class.signature,
                new = %signature,
                "rebuilt record class signature"
            );
            class.signature = Some(signature.clone());
            outcome.signature = Some(signature);
        }

        outcome
    }
}

/// Type variables referenced by a class's members, plus the ones its
/// current class signature already declares.
#[derive(Debug)]
struct MemberScan {
    bindings: TypeVariableBindings,
    class_declared: HashSet<String>,
}

impl MemberScan {
    /// `true` if some referenced variable is not declared at class level.
    fn requires_declaration(&self) -> bool {
        self.bindings
            .names()
            .any(|name| !self.class_declared.contains(name))
    }
}

/// Repairs records whose `Record` and `Signature` attributes were stripped.
///
/// A fix pass is self-contained: it reads the class and the registry, and only
/// writes to the class once every step has succeeded. Non-record classes are
/// never modified.
pub struct RecordFixer<'a, R: ?Sized> {
    registry: &'a R,
    config: &'a RecordFixConfig,
}

impl<'a, R> RecordFixer<'a, R>
where
    R: ClassRegistry + ?Sized,
{
    pub fn new(registry: &'a R, config: &'a RecordFixConfig) -> Self {
        Self { registry, config }
    }

    pub fn fix(&self, class: &mut ClassStub) -> Result<FixOutcome, RecordFixError> {
        if !class.is_record() {
            return Ok(FixOutcome::default());
        }
        let plan = self.plan(class)?;
        Ok(plan.apply(class))
    }

    fn plan(&self, class: &ClassStub) -> Result<FixPlan, RecordFixError> {
        let scan = if self.config.patch_signature {
            Some(scan_members(class)?)
        } else {
            None
        };

        let components = if self.config.patch_components && !class.has_record_components() {
            Some(synthesize_components(class)).filter(|components| !components.is_empty())
        } else {
            None
        };

        // Visibility is only restored together with the component list it backs.
        let private_fields = if self.config.patch_components && self.config.restore_private_fields {
            class
                .fields
                .iter()
                .enumerate()
                .filter(|(_, field)| {
                    field.is_final_instance() && make_private(field.access_flags) != field.access_flags
                })
                .map(|(index, _)| index)
                .collect()
        } else {
            Vec::new()
        };

        if let Some(scan) = &scan {
            tracing::trace!(
                target: "nova.records",
                class = %class.internal_name,
                variables = scan.bindings.len(),
                declared = scan.class_declared.len(),
                "scanned record members"
            );
        }

        let signature = match scan {
            Some(scan) if scan.requires_declaration() => {
                Some(build_class_signature(class, &scan.bindings, self.registry)?)
            }
            _ => None,
        };

        Ok(FixPlan {
            components,
            signature,
            private_fields,
        })
    }
}

/// Fixes `class` with the default configuration.
pub fn fix_record<R>(class: &mut ClassStub, registry: &R) -> Result<FixOutcome, RecordFixError>
where
    R: ClassRegistry + ?Sized,
{
    RecordFixer::new(registry, &RecordFixConfig::default()).fix(class)
}

fn scan_members(class: &ClassStub) -> Result<MemberScan, RecordFixError> {
    let malformed = |member: Member| {
        let class = class.internal_name.clone();
        move |source| RecordFixError::MalformedSignature {
            class,
            member,
            source,
        }
    };
    let invalid_descriptor = |member: Member| {
        let class = class.internal_name.clone();
        move |source| RecordFixError::InvalidDescriptor {
            class,
            member,
            source,
        }
    };

    let mut collector = TypeVariableCollector::new();

    let class_declared = match class.signature.as_deref() {
        Some(signature) => {
            collector
                .collect(signature, SignatureKind::Class, MemberContext::Unknown)
                .map_err(malformed(Member::ClassSignature))?;
            declared_type_parameter_set(signature).map_err(malformed(Member::ClassSignature))?
        }
        None => HashSet::new(),
    };

    for component in class.record_components.iter().flatten() {
        let Some(signature) = component.signature.as_deref() else {
            continue;
        };
        let member = || Member::RecordComponent {
            name: component.name.clone(),
            descriptor: component.descriptor.clone(),
        };
        let ty = component
            .parsed_descriptor()
            .map_err(invalid_descriptor(member()))?;
        collector
            .collect(signature, SignatureKind::Field, MemberContext::Field(&ty))
            .map_err(malformed(member()))?;
    }

    for field in &class.fields {
        let Some(signature) = field.signature.as_deref() else {
            continue;
        };
        let member = || Member::Field {
            name: field.name.clone(),
            descriptor: field.descriptor.clone(),
        };
        let ty = field.parsed_descriptor().map_err(invalid_descriptor(member()))?;
        collector
            .collect(signature, SignatureKind::Field, MemberContext::Field(&ty))
            .map_err(malformed(member()))?;
    }

    // Every method walk starts from an empty set of declared parameters, so
    // method-level type parameters never become class-level ones.
    for method in &class.methods {
        let Some(signature) = method.signature.as_deref() else {
            continue;
        };
        let member = || Member::Method {
            name: method.name.clone(),
            descriptor: method.descriptor.clone(),
        };
        let desc = method.parsed_descriptor().map_err(invalid_descriptor(member()))?;
        collector
            .collect(signature, SignatureKind::Method, MemberContext::Method(&desc))
            .map_err(malformed(member()))?;
    }

    Ok(MemberScan {
        bindings: collector.into_bindings(),
        class_declared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryClassRegistry;
    use nova_classfile::access::{ACC_FINAL, ACC_PRIVATE, ACC_PUBLIC};
    use nova_classfile::{FieldStub, RECORD_BASE};
    use pretty_assertions::assert_eq;

    #[test]
    fn plan_failure_leaves_class_untouched() {
        let mut class = ClassStub::new("com/example/Box", Some(RECORD_BASE));
        class.fields = vec![
            FieldStub::new(ACC_PUBLIC | ACC_FINAL, "value", "Lcom/example/Missing;")
                .with_signature("TT;"),
        ];
        let before = class.clone();

        let config = RecordFixConfig {
            restore_private_fields: true,
            ..RecordFixConfig::default()
        };
        let registry = InMemoryClassRegistry::with_minimal_jdk();
        let err = RecordFixer::new(&registry, &config)
            .fix(&mut class)
            .unwrap_err();
        assert!(matches!(err, RecordFixError::UnresolvableBound { .. }));
        assert_eq!(class, before);
    }

    #[test]
    fn restores_private_visibility_when_enabled() {
        let mut class = ClassStub::new("com/example/Point", Some(RECORD_BASE));
        class.fields = vec![
            FieldStub::new(ACC_PUBLIC | ACC_FINAL, "x", "I"),
            FieldStub::new(ACC_PRIVATE | ACC_FINAL, "y", "I"),
        ];
        let config = RecordFixConfig {
            restore_private_fields: true,
            ..RecordFixConfig::default()
        };
        let registry = InMemoryClassRegistry::new();
        let outcome = RecordFixer::new(&registry, &config).fix(&mut class).unwrap();

        assert_eq!(outcome.fields_made_private, 1);
        assert_eq!(outcome.components_added, 2);
        assert_eq!(class.fields[0].access_flags, ACC_PRIVATE | ACC_FINAL);
        assert_eq!(class.fields[1].access_flags, ACC_PRIVATE | ACC_FINAL);
    }

    #[test]
    fn visibility_is_left_alone_without_component_patching() {
        let mut class = ClassStub::new("com/example/Point", Some(RECORD_BASE));
        class.fields = vec![FieldStub::new(ACC_PUBLIC | ACC_FINAL, "x", "I")];
        let config = RecordFixConfig {
            patch_components: false,
            restore_private_fields: true,
            ..RecordFixConfig::default()
        };
        let registry = InMemoryClassRegistry::new();
        let outcome = RecordFixer::new(&registry, &config).fix(&mut class).unwrap();

        assert!(outcome.is_unchanged());
        assert_eq!(class.fields[0].access_flags, ACC_PUBLIC | ACC_FINAL);
    }

    #[test]
    fn switches_disable_individual_repairs() {
        let mut class = ClassStub::new("com/example/Box", Some(RECORD_BASE));
        class.fields = vec![
            FieldStub::new(ACC_PRIVATE | ACC_FINAL, "value", "Ljava/lang/Object;")
                .with_signature("TT;"),
        ];
        let registry = InMemoryClassRegistry::new();

        let mut only_components = class.clone();
        let config = RecordFixConfig {
            patch_signature: false,
            ..RecordFixConfig::default()
        };
        let outcome = RecordFixer::new(&registry, &config)
            .fix(&mut only_components)
            .unwrap();
        assert_eq!(outcome.components_added, 1);
        assert_eq!(only_components.signature, None);

        let mut only_signature = class.clone();
        let config = RecordFixConfig {
            patch_components: false,
            ..RecordFixConfig::default()
        };
        let outcome = RecordFixer::new(&registry, &config)
            .fix(&mut only_signature)
            .unwrap();
        assert_eq!(outcome.components_added, 0);
        assert_eq!(only_signature.record_components, None);
        assert_eq!(
            only_signature.signature.as_deref(),
            Some("<T:Ljava/lang/Object;>Ljava/lang/Record;")
        );
    }
}
