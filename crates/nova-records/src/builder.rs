//! Emitting a class signature that declares every discovered type variable.

use nova_classfile::{
    validate_signature, ClassStub, SignatureEvent, SignatureKind, SignatureWriter, OBJECT,
    RECORD_BASE,
};

use crate::error::{Member, RecordFixError};
use crate::inference::{Bound, TypeVariableBindings};
use crate::registry::ClassRegistry;

/// Builds `<T:bound;...>Ljava/lang/Record;Liface;...` for `class`.
///
/// Type parameters appear in discovery order. Superclass and interfaces are
/// written as raw types: records have no generic superclass, and the type
/// arguments of their interfaces are not recoverable.
///
/// The result always re-walks as a class signature. Binary names may contain
/// characters that are not allowed in signature identifiers (`<`, `:`...);
/// such classes fail with [`RecordFixError::MalformedSignature`].
pub fn build_class_signature<R>(
    class: &ClassStub,
    bindings: &TypeVariableBindings,
    registry: &R,
) -> Result<String, RecordFixError>
where
    R: ClassRegistry + ?Sized,
{
    let mut events = Vec::new();

    for (name, bound) in bindings.iter() {
        events.push(SignatureEvent::FormalTypeParameter(name));
        match bound {
            Bound::Unresolved => {
                events.push(SignatureEvent::ClassBound);
                events.push(SignatureEvent::ClassType(OBJECT));
            }
            Bound::Erased(erasure) => {
                let info = registry
                    .lookup(erasure)
                    .map_err(|source| RecordFixError::RegistryUnavailable {
                        class: class.internal_name.clone(),
                        variable: name.to_string(),
                        bound: erasure.clone(),
                        source,
                    })?
                    .ok_or_else(|| RecordFixError::UnresolvableBound {
                        class: class.internal_name.clone(),
                        variable: name.to_string(),
                        bound: erasure.clone(),
                    })?;
                events.push(if info.is_interface {
                    SignatureEvent::InterfaceBound
                } else {
                    SignatureEvent::ClassBound
                });
                events.push(SignatureEvent::ClassType(erasure));
            }
        }
        events.push(SignatureEvent::End);
    }

    events.push(SignatureEvent::Superclass);
    events.push(SignatureEvent::ClassType(RECORD_BASE));
    events.push(SignatureEvent::End);

    for interface in &class.interfaces {
        events.push(SignatureEvent::Interface);
        events.push(SignatureEvent::ClassType(interface));
        events.push(SignatureEvent::End);
    }

    let malformed = |source| RecordFixError::MalformedSignature {
        class: class.internal_name.clone(),
        member: Member::ClassSignature,
        source,
    };
    let signature = SignatureWriter::write_all(events).map_err(malformed)?;
    validate_signature(&signature, SignatureKind::Class).map_err(malformed)?;
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{MemberContext, TypeVariableCollector};
    use crate::registry::{InMemoryClassRegistry, RegistryError};
    use crate::ClassInfo;
    use nova_classfile::{parse_field_descriptor, validate_signature, SignatureKind};
    use pretty_assertions::assert_eq;

    fn bindings(fields: &[(&str, &str)]) -> TypeVariableBindings {
        let mut collector = TypeVariableCollector::new();
        for (descriptor, signature) in fields {
            let ty = parse_field_descriptor(descriptor).unwrap();
            collector
                .collect(signature, SignatureKind::Field, MemberContext::Field(&ty))
                .unwrap();
        }
        collector.into_bindings()
    }

    struct Offline;

    impl ClassRegistry for Offline {
        fn lookup(&self, _internal_name: &str) -> Result<Option<ClassInfo>, RegistryError> {
            Err(RegistryError::Unavailable("index is still loading".to_string()))
        }
    }

    #[test]
    fn class_and_interface_bounds() {
        let mut class = ClassStub::new("com/example/Entry", Some(RECORD_BASE));
        class.interfaces = vec!["java/io/Serializable".to_string(), "java/lang/Runnable".to_string()];
        let bindings = bindings(&[
            ("Ljava/lang/Object;", "TT;"),
            ("Ljava/lang/Comparable;", "TC;"),
            ("Ljava/lang/Number;", "TN;"),
        ]);

        let sig = build_class_signature(
            &class,
            &bindings,
            &InMemoryClassRegistry::with_minimal_jdk(),
        )
        .unwrap();
        assert_eq!(
            sig,
            "<T:Ljava/lang/Object;C::Ljava/lang/Comparable;N:Ljava/lang/Number;>Ljava/lang/Record;Ljava/io/Serializable;Ljava/lang/Runnable;"
        );
        validate_signature(&sig, SignatureKind::Class).unwrap();
    }

    #[test]
    fn unknown_erasure_is_unresolvable() {
        let class = ClassStub::new("com/example/Box", Some(RECORD_BASE));
        let bindings = bindings(&[("Lcom/example/Missing;", "TT;")]);
        let err = build_class_signature(&class, &bindings, &InMemoryClassRegistry::new()).unwrap_err();
        match err {
            RecordFixError::UnresolvableBound {
                class,
                variable,
                bound,
            } => {
                assert_eq!(class, "com/example/Box");
                assert_eq!(variable, "T");
                assert_eq!(bound, "com/example/Missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unavailable_registry_is_distinct() {
        let class = ClassStub::new("com/example/Box", Some(RECORD_BASE));
        let bindings = bindings(&[("Lcom/example/Missing;", "TT;")]);
        let err = build_class_signature(&class, &bindings, &Offline).unwrap_err();
        assert!(matches!(err, RecordFixError::RegistryUnavailable { .. }), "{err}");
    }

    #[test]
    fn names_that_cannot_appear_in_signatures_are_rejected() {
        let class = ClassStub::new("p/Rec", Some(RECORD_BASE));
        let generic_bound = bindings(&[("Lp/a<b;", "TT;")]);
        let mut registry = InMemoryClassRegistry::new();
        registry.insert("p/a<b", ClassInfo::CLASS);
        let err = build_class_signature(&class, &generic_bound, &registry).unwrap_err();
        assert!(
            matches!(
                err,
                RecordFixError::MalformedSignature {
                    member: Member::ClassSignature,
                    ..
                }
            ),
            "{err}"
        );

        let mut class = ClassStub::new("p/Rec", Some(RECORD_BASE));
        class.interfaces = vec!["p/I:x".to_string()];
        let unresolved = bindings(&[("Ljava/lang/Object;", "TT;")]);
        let err = build_class_signature(&class, &unresolved, &registry).unwrap_err();
        assert!(
            matches!(
                err,
                RecordFixError::MalformedSignature {
                    member: Member::ClassSignature,
                    ..
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn unresolved_bounds_never_query_the_registry() {
        let class = ClassStub::new("com/example/Box", Some(RECORD_BASE));
        let bindings = bindings(&[("Ljava/util/List;", "Ljava/util/List<TT;>;")]);
        let sig = build_class_signature(&class, &bindings, &Offline).unwrap();
        assert_eq!(sig, "<T:Ljava/lang/Object;>Ljava/lang/Record;");
    }
}
