use crate::descriptor::BaseType;

/// Which production of the signature grammar a string is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    /// `ClassSignature`: formal type parameters, superclass, interfaces.
    Class,
    /// `MethodSignature`: formal type parameters, parameters, return, throws.
    Method,
    /// `FieldSignature`; also used for record components.
    Field,
}

/// Variance marker of a bounded type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wildcard {
    /// `+`
    Extends,
    /// `-`
    Super,
    /// No marker, an invariant argument.
    Exact,
}

impl Wildcard {
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => Wildcard::Extends,
            '-' => Wildcard::Super,
            _ => Wildcard::Exact,
        }
    }

    pub fn marker(self) -> Option<char> {
        match self {
            Wildcard::Extends => Some('+'),
            Wildcard::Super => Some('-'),
            Wildcard::Exact => None,
        }
    }
}

/// One structural step of a generic signature.
///
/// `ClassType`, `InnerClassType` and `TypeArgument` open a structure which is
/// closed by a matching `End`. An inner class is reached by closing its outer
/// class first, so `Lp/Outer<TT;>.Inner;` is
/// `ClassType(p/Outer) TypeArgument TypeVariable(T) End End InnerClassType(Inner) End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureEvent<'a> {
    FormalTypeParameter(&'a str),
    ClassBound,
    InterfaceBound,
    Superclass,
    Interface,
    ParameterType,
    ReturnType,
    ExceptionType,
    BaseType(BaseType),
    VoidType,
    ArrayType,
    ClassType(&'a str),
    InnerClassType(&'a str),
    TypeArgument(Wildcard),
    UnboundedTypeArgument,
    TypeVariable(&'a str),
    End,
}

impl SignatureEvent<'_> {
    /// `true` for events that open a structure closed by [`SignatureEvent::End`].
    pub fn opens_structure(&self) -> bool {
        matches!(
            self,
            SignatureEvent::ClassType(_)
                | SignatureEvent::InnerClassType(_)
                | SignatureEvent::TypeArgument(_)
        )
    }
}
