//! Discovery of free type variables and best-effort bounds for them.

use std::collections::HashSet;

use indexmap::IndexMap;
use nova_classfile::{
    FieldType, MemberPosition, MethodDescriptor, Result, SignatureEvent, SignatureKind,
    SignatureWalker, WalkContext, OBJECT,
};

/// Inferred bound of an undeclared type variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bound {
    /// No usable evidence; emitted as `java/lang/Object`.
    Unresolved,
    /// Erasure of the type the variable was directly used as.
    Erased(String),
}

/// Type variables in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeVariableBindings {
    bindings: IndexMap<String, Bound>,
}

impl TypeVariableBindings {
    pub fn get(&self, name: &str) -> Option<&Bound> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bound)> + '_ {
        self.bindings.iter().map(|(name, bound)| (name.as_str(), bound))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.keys().map(String::as_str)
    }
}

/// Erased descriptor types of the member whose signature is walked.
#[derive(Debug, Clone, Copy)]
pub enum MemberContext<'d> {
    /// A field or record component of the given type.
    Field(&'d FieldType),
    Method(&'d MethodDescriptor),
    /// No descriptor information (e.g. the class signature itself).
    Unknown,
}

impl<'d> MemberContext<'d> {
    /// Erasure of the type at `position`, after removing `array_dims` array
    /// dimensions. Only class and interface types have a usable erasure.
    fn erasure_at(&self, position: MemberPosition, array_dims: usize) -> Option<&'d str> {
        let ty = match (*self, position) {
            (MemberContext::Field(ty), MemberPosition::Field) => ty,
            (MemberContext::Method(desc), MemberPosition::ReturnType) => {
                desc.return_type.as_field_type()?
            }
            (MemberContext::Method(desc), MemberPosition::Parameter(index)) => {
                desc.params.get(index)?
            }
            _ => return None,
        };
        ty.element_type(array_dims)?.internal_name()
    }
}

/// Folds type variable references from many signatures into one
/// [`TypeVariableBindings`].
///
/// Precedence: the first level-0 reference with a usable context type wins.
/// Nested references (inside type arguments) and references without context
/// only record the variable as [`Bound::Unresolved`], which a later level-0
/// reference may still upgrade. An erased bound is never replaced.
#[derive(Debug, Default)]
pub struct TypeVariableCollector {
    bindings: TypeVariableBindings,
}

impl TypeVariableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks one signature and records every type variable it references but
    /// does not declare itself.
    pub fn collect(
        &mut self,
        signature: &str,
        kind: SignatureKind,
        member: MemberContext<'_>,
    ) -> Result<()> {
        // Formal parameters may be referenced before their declaration
        // (`<T:TU;U:Ljava/lang/Object;>`), so gather them up front.
        let declared = declared_type_parameters(signature, kind)?;

        let mut ctx = WalkContext::new(signature, kind);
        for event in SignatureWalker::new(signature, kind) {
            let event = event?;
            ctx.apply(&event)?;
            if let SignatureEvent::TypeVariable(name) = event {
                if !ctx.is_declared(name) && !declared.contains(&name) {
                    self.observe(name, &ctx, member);
                }
            }
        }
        ctx.finish()
    }

    fn observe(&mut self, name: &str, ctx: &WalkContext<'_>, member: MemberContext<'_>) {
        if let Some(Bound::Erased(_)) = self.bindings.get(name) {
            return;
        }

        let erasure = if ctx.level() == 0 {
            member.erasure_at(ctx.position(), ctx.array_dims())
        } else {
            None
        };
        let bound = match erasure {
            // `T value` is erased to Object: nothing learned.
            Some(erasure) if erasure != OBJECT => Bound::Erased(erasure.to_string()),
            _ => Bound::Unresolved,
        };
        // Re-inserting an existing key keeps its discovery position.
        self.bindings.bindings.insert(name.to_string(), bound);
    }

    pub fn bindings(&self) -> &TypeVariableBindings {
        &self.bindings
    }

    pub fn into_bindings(self) -> TypeVariableBindings {
        self.bindings
    }
}

/// Formal type parameters declared by a class or method signature, in order.
pub fn declared_type_parameters(signature: &str, kind: SignatureKind) -> Result<Vec<&str>> {
    let mut declared = Vec::new();
    if kind == SignatureKind::Field {
        return Ok(declared);
    }
    for event in SignatureWalker::new(signature, kind) {
        match event? {
            SignatureEvent::FormalTypeParameter(name) => declared.push(name),
            SignatureEvent::Superclass | SignatureEvent::ParameterType | SignatureEvent::ReturnType => {
                break
            }
            _ => {}
        }
    }
    Ok(declared)
}

/// Names declared by an existing class signature.
pub(crate) fn declared_type_parameter_set(signature: &str) -> Result<HashSet<String>> {
    Ok(declared_type_parameters(signature, SignatureKind::Class)?
        .into_iter()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_classfile::{parse_field_descriptor, parse_method_descriptor};
    use pretty_assertions::assert_eq;

    fn field_bindings(fields: &[(&str, &str)]) -> TypeVariableBindings {
        let mut collector = TypeVariableCollector::new();
        for (descriptor, signature) in fields {
            let ty = parse_field_descriptor(descriptor).unwrap();
            collector
                .collect(signature, SignatureKind::Field, MemberContext::Field(&ty))
                .unwrap();
        }
        collector.into_bindings()
    }

    #[test]
    fn level_zero_reference_uses_field_erasure() {
        let bindings = field_bindings(&[("Ljava/lang/Comparable;", "TT;")]);
        assert_eq!(
            bindings.get("T"),
            Some(&Bound::Erased("java/lang/Comparable".to_string()))
        );
    }

    #[test]
    fn object_erasure_is_unresolved() {
        let bindings = field_bindings(&[("Ljava/lang/Object;", "TT;")]);
        assert_eq!(bindings.get("T"), Some(&Bound::Unresolved));
    }

    #[test]
    fn nested_reference_is_unresolved() {
        let bindings = field_bindings(&[("Ljava/util/List;", "Ljava/util/List<TT;>;")]);
        assert_eq!(bindings.get("T"), Some(&Bound::Unresolved));
    }

    #[test]
    fn unresolved_is_upgraded_but_erased_is_kept() {
        let bindings = field_bindings(&[
            ("Ljava/util/List;", "Ljava/util/List<TT;>;"),
            ("Ljava/lang/Number;", "TT;"),
            ("Ljava/lang/CharSequence;", "TT;"),
            ("Ljava/util/List;", "Ljava/util/List<TT;>;"),
        ]);
        assert_eq!(
            bindings.get("T"),
            Some(&Bound::Erased("java/lang/Number".to_string()))
        );
    }

    #[test]
    fn discovery_order_is_preserved() {
        let bindings = field_bindings(&[
            ("Ljava/util/Map;", "Ljava/util/Map<TK;TV;>;"),
            ("Ljava/lang/Number;", "TV;"),
            ("Ljava/lang/Object;", "TA;"),
        ]);
        assert_eq!(bindings.names().collect::<Vec<_>>(), vec!["K", "V", "A"]);
        assert_eq!(
            bindings.get("V"),
            Some(&Bound::Erased("java/lang/Number".to_string()))
        );
    }

    #[test]
    fn array_dimensions_are_peeled() {
        let bindings = field_bindings(&[("[[Ljava/lang/Number;", "[[TT;")]);
        assert_eq!(
            bindings.get("T"),
            Some(&Bound::Erased("java/lang/Number".to_string()))
        );

        // Dimensions that do not line up give no context.
        let bindings = field_bindings(&[("[Ljava/lang/Number;", "TT;")]);
        assert_eq!(bindings.get("T"), Some(&Bound::Unresolved));
    }

    #[test]
    fn method_parameters_and_return_type_give_context() {
        let desc = parse_method_descriptor("(ILjava/lang/Number;)Ljava/lang/CharSequence;").unwrap();
        let mut collector = TypeVariableCollector::new();
        collector
            .collect("(ITA;)TR;", SignatureKind::Method, MemberContext::Method(&desc))
            .unwrap();
        let bindings = collector.into_bindings();
        assert_eq!(
            bindings.get("A"),
            Some(&Bound::Erased("java/lang/Number".to_string()))
        );
        assert_eq!(
            bindings.get("R"),
            Some(&Bound::Erased("java/lang/CharSequence".to_string()))
        );
    }

    #[test]
    fn method_local_parameters_do_not_leak() {
        let desc = parse_method_descriptor("(Ljava/util/List;)Ljava/lang/Object;").unwrap();
        let mut collector = TypeVariableCollector::new();
        collector
            .collect(
                "<U:TT;>(Ljava/util/List<TU;>;)TU;",
                SignatureKind::Method,
                MemberContext::Method(&desc),
            )
            .unwrap();
        collector
            .collect(
                "<V:TW;W:Ljava/lang/Object;>(Ljava/util/List<TV;>;)TW;",
                SignatureKind::Method,
                MemberContext::Method(&desc),
            )
            .unwrap();
        let bindings = collector.into_bindings();
        assert_eq!(bindings.names().collect::<Vec<_>>(), vec!["T"]);
        assert_eq!(bindings.get("T"), Some(&Bound::Unresolved));
    }

    #[test]
    fn parameter_index_out_of_range_is_unresolved() {
        let desc = parse_method_descriptor("()V").unwrap();
        let mut collector = TypeVariableCollector::new();
        collector
            .collect("(TT;)V", SignatureKind::Method, MemberContext::Method(&desc))
            .unwrap();
        assert_eq!(collector.bindings().get("T"), Some(&Bound::Unresolved));
    }

    #[test]
    fn unbalanced_signature_is_an_error() {
        let ty = parse_field_descriptor("Ljava/util/List;").unwrap();
        let mut collector = TypeVariableCollector::new();
        let err = collector
            .collect(
                "Ljava/util/List<TT;>>;",
                SignatureKind::Field,
                MemberContext::Field(&ty),
            )
            .unwrap_err();
        assert!(err.is_unbalanced());
    }

    #[test]
    fn declared_parameters_of_class_signature() {
        assert_eq!(
            declared_type_parameters(
                "<T:Ljava/lang/Object;U::Ljava/lang/Comparable<TU;>;>Ljava/lang/Record;",
                SignatureKind::Class
            )
            .unwrap(),
            vec!["T", "U"]
        );
        assert!(declared_type_parameters("Ljava/lang/Record;", SignatureKind::Class)
            .unwrap()
            .is_empty());
    }
}
