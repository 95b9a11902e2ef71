use std::collections::HashSet;

use crate::error::{Error, Result};

use super::model::{SignatureEvent, SignatureKind};

/// Which part of a member's signature the walk is currently describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberPosition {
    /// The type of a field or record component.
    Field,
    /// Bounds of a formal type parameter.
    FormalBound,
    Superclass,
    Interface,
    /// The N-th (zero-based) method parameter.
    Parameter(usize),
    ReturnType,
    Exception,
}

/// Per-walk state derived from the event stream.
///
/// A fresh context is created for every signature that is walked, so state
/// never leaks between members (or between classes processed in parallel).
#[derive(Debug, Clone)]
pub struct WalkContext<'a> {
    signature: &'a str,
    level: usize,
    position: MemberPosition,
    next_parameter: usize,
    array_dims: usize,
    last_was_array: bool,
    declared: HashSet<&'a str>,
}

impl<'a> WalkContext<'a> {
    pub fn new(signature: &'a str, kind: SignatureKind) -> Self {
        let position = match kind {
            SignatureKind::Field => MemberPosition::Field,
            SignatureKind::Class | SignatureKind::Method => MemberPosition::FormalBound,
        };
        Self {
            signature,
            level: 0,
            position,
            next_parameter: 0,
            array_dims: 0,
            last_was_array: false,
            declared: HashSet::new(),
        }
    }

    /// Advances the context past `event`.
    ///
    /// Fails when `event` closes a structure that was never opened.
    pub fn apply(&mut self, event: &SignatureEvent<'a>) -> Result<()> {
        if !self.last_was_array {
            self.array_dims = 0;
        }
        self.last_was_array = matches!(event, SignatureEvent::ArrayType);
        if event.opens_structure() {
            self.level += 1;
        }

        match *event {
            SignatureEvent::FormalTypeParameter(name) => {
                self.declared.insert(name);
                self.position = MemberPosition::FormalBound;
            }
            SignatureEvent::Superclass => self.position = MemberPosition::Superclass,
            SignatureEvent::Interface => self.position = MemberPosition::Interface,
            SignatureEvent::ParameterType => {
                self.position = MemberPosition::Parameter(self.next_parameter);
                self.next_parameter += 1;
            }
            SignatureEvent::ReturnType => self.position = MemberPosition::ReturnType,
            SignatureEvent::ExceptionType => self.position = MemberPosition::Exception,
            SignatureEvent::ArrayType => self.array_dims += 1,
            SignatureEvent::End => {
                self.level = self
                    .level
                    .checked_sub(1)
                    .ok_or_else(|| Error::unbalanced(self.signature, None))?;
            }
            SignatureEvent::ClassType(_)
            | SignatureEvent::InnerClassType(_)
            | SignatureEvent::TypeArgument(_)
            | SignatureEvent::ClassBound
            | SignatureEvent::InterfaceBound
            | SignatureEvent::BaseType(_)
            | SignatureEvent::VoidType
            | SignatureEvent::UnboundedTypeArgument
            | SignatureEvent::TypeVariable(_) => {}
        }
        Ok(())
    }

    /// Current nesting level; 0 means "directly at the member's own type".
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn position(&self) -> MemberPosition {
        self.position
    }

    /// Number of array dimensions directly wrapping the most recent event.
    pub fn array_dims(&self) -> usize {
        self.array_dims
    }

    /// `true` if `name` is a formal type parameter declared by this signature.
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// Ends the walk; every opened structure must have been closed.
    pub fn finish(self) -> Result<()> {
        if self.level == 0 {
            Ok(())
        } else {
            Err(Error::unbalanced(self.signature, None))
        }
    }
}
