use crate::error::{Error, Result};

use super::model::SignatureEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ListState {
    #[default]
    NotStarted,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Class { has_arguments: bool },
    Argument,
}

/// Renders [`SignatureEvent`]s back into signature text.
///
/// This is the inverse of [`super::SignatureWalker`]: writing the events of a
/// walk reproduces the walked signature.
#[derive(Debug, Default)]
pub struct SignatureWriter {
    out: String,
    formals: ListState,
    parameters: ListState,
    frames: Vec<Frame>,
    // `;` of a finished class type, held back in case an inner class follows.
    pending_semicolon: bool,
}

impl SignatureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a complete event stream.
    pub fn write_all<'a>(events: impl IntoIterator<Item = SignatureEvent<'a>>) -> Result<String> {
        let mut writer = SignatureWriter::new();
        for event in events {
            writer.write(event)?;
        }
        writer.finish()
    }

    pub fn write(&mut self, event: SignatureEvent<'_>) -> Result<()> {
        if self.pending_semicolon && !matches!(event, SignatureEvent::InnerClassType(_)) {
            self.out.push(';');
            self.pending_semicolon = false;
        }

        match event {
            SignatureEvent::FormalTypeParameter(name) => {
                match self.formals {
                    ListState::NotStarted => {
                        self.out.push('<');
                        self.formals = ListState::Open;
                    }
                    ListState::Open => {}
                    ListState::Closed => {
                        return Err(self.invalid("type parameter after the parameter list"))
                    }
                }
                self.out.push_str(name);
                self.out.push(':');
            }
            SignatureEvent::ClassBound => {}
            SignatureEvent::InterfaceBound => self.out.push(':'),
            SignatureEvent::Superclass | SignatureEvent::Interface => self.close_formals(),
            SignatureEvent::ParameterType => {
                self.close_formals();
                self.open_parameters();
            }
            SignatureEvent::ReturnType => {
                self.close_formals();
                self.open_parameters();
                self.out.push(')');
                self.parameters = ListState::Closed;
            }
            SignatureEvent::ExceptionType => self.out.push('^'),
            SignatureEvent::BaseType(base) => self.out.push(base.as_char()),
            SignatureEvent::VoidType => self.out.push('V'),
            SignatureEvent::ArrayType => self.out.push('['),
            SignatureEvent::ClassType(name) => {
                self.out.push('L');
                self.out.push_str(name);
                self.frames.push(Frame::Class {
                    has_arguments: false,
                });
            }
            SignatureEvent::InnerClassType(name) => {
                if !self.pending_semicolon {
                    return Err(self.invalid("inner class type without an outer class"));
                }
                self.pending_semicolon = false;
                self.out.push('.');
                self.out.push_str(name);
                self.frames.push(Frame::Class {
                    has_arguments: false,
                });
            }
            SignatureEvent::TypeArgument(wildcard) => {
                self.open_arguments()?;
                if let Some(marker) = wildcard.marker() {
                    self.out.push(marker);
                }
                self.frames.push(Frame::Argument);
            }
            SignatureEvent::UnboundedTypeArgument => {
                self.open_arguments()?;
                self.out.push('*');
            }
            SignatureEvent::TypeVariable(name) => {
                self.out.push('T');
                self.out.push_str(name);
                self.out.push(';');
            }
            SignatureEvent::End => match self.frames.pop() {
                None => return Err(Error::unbalanced(&self.out, Some(self.out.len()))),
                Some(Frame::Argument) => {}
                Some(Frame::Class { has_arguments }) => {
                    if has_arguments {
                        self.out.push('>');
                    }
                    self.pending_semicolon = true;
                }
            },
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<String> {
        if self.pending_semicolon {
            self.out.push(';');
        }
        if !self.frames.is_empty() {
            return Err(Error::unbalanced(&self.out, None));
        }
        if self.formals == ListState::Open {
            return Err(self.invalid("type parameter list is never closed"));
        }
        if self.parameters == ListState::Open {
            return Err(self.invalid("method signature without a return type"));
        }
        Ok(self.out)
    }

    fn invalid(&self, reason: &'static str) -> Error {
        Error::invalid_signature(&self.out, self.out.len(), reason)
    }

    fn close_formals(&mut self) {
        if self.formals == ListState::Open {
            self.out.push('>');
            self.formals = ListState::Closed;
        }
    }

    fn open_parameters(&mut self) {
        if self.parameters == ListState::NotStarted {
            self.out.push('(');
            self.parameters = ListState::Open;
        }
    }

    fn open_arguments(&mut self) -> Result<()> {
        match self.frames.last_mut() {
            Some(Frame::Class { has_arguments }) => {
                if !*has_arguments {
                    *has_arguments = true;
                    self.out.push('<');
                }
                Ok(())
            }
            _ => Err(self.invalid("type argument outside of a class type")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{SignatureKind, SignatureWalker, Wildcard};
    use pretty_assertions::assert_eq;

    fn rewrite(sig: &str, kind: SignatureKind) -> String {
        let events = SignatureWalker::new(sig, kind)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        SignatureWriter::write_all(events).unwrap()
    }

    #[test]
    fn rewrites_walked_signatures_verbatim() {
        for (sig, kind) in [
            ("TT;", SignatureKind::Field),
            ("[[I", SignatureKind::Field),
            ("Ljava/util/Map<TK;-Ljava/lang/Number;>;", SignatureKind::Field),
            ("Lp/Outer<TT;>.Inner<*>.Deeper;", SignatureKind::Field),
            (
                "<T:Ljava/lang/Object;U::Ljava/lang/Comparable<TU;>;:Ljava/io/Serializable;>Ljava/lang/Record;Ljava/lang/Runnable;",
                SignatureKind::Class,
            ),
            ("<T:>Ljava/lang/Object;", SignatureKind::Class),
            ("()V", SignatureKind::Method),
            ("<X:Ljava/lang/Exception;>(ITT;)[TT;^TX;^Ljava/io/IOException;", SignatureKind::Method),
        ] {
            assert_eq!(rewrite(sig, kind), sig);
        }
    }

    #[test]
    fn builds_class_signature_from_events() {
        let sig = SignatureWriter::write_all([
            SignatureEvent::FormalTypeParameter("T"),
            SignatureEvent::ClassBound,
            SignatureEvent::ClassType("java/lang/Object"),
            SignatureEvent::End,
            SignatureEvent::FormalTypeParameter("C"),
            SignatureEvent::InterfaceBound,
            SignatureEvent::ClassType("java/lang/Comparable"),
            SignatureEvent::End,
            SignatureEvent::Superclass,
            SignatureEvent::ClassType("java/lang/Record"),
            SignatureEvent::End,
        ])
        .unwrap();
        assert_eq!(sig, "<T:Ljava/lang/Object;C::Ljava/lang/Comparable;>Ljava/lang/Record;");
    }

    #[test]
    fn rejects_unbalanced_streams() {
        let err = SignatureWriter::write_all([SignatureEvent::End]).unwrap_err();
        assert!(err.is_unbalanced());

        let err = SignatureWriter::write_all([SignatureEvent::ClassType("java/util/List")]).unwrap_err();
        assert!(err.is_unbalanced());

        assert!(SignatureWriter::write_all([SignatureEvent::TypeArgument(Wildcard::Exact)]).is_err());
    }
}
