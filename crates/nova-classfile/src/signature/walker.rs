use crate::descriptor::BaseType;
use crate::error::{Error, Result};

use super::model::{SignatureEvent, SignatureKind, Wildcard};

/// Pending grammar productions, kept on an explicit stack so that walking a
/// deeply nested signature never recurses.
#[derive(Debug, Clone, Copy)]
enum Task<'a> {
    FormalTypeParameters,
    FormalTypeParameterList { first: bool },
    ClassBound,
    InterfaceBounds,
    Superclass,
    Interfaces,
    Parameters,
    ParameterList,
    ReturnType,
    Exceptions,
    JavaType,
    ReferenceType,
    ClassType,
    ClassTypeTail,
    ClassTypeSuffix,
    TypeArgumentList { first: bool },
    Emit(SignatureEvent<'a>),
}

/// Lazy left-to-right traversal of a generic signature (JVMS 4.7.9.1).
///
/// Each call to `next` parses just enough input to produce one
/// [`SignatureEvent`]. The first error ends the walk. Walks are restartable:
/// cloning a walker or creating a new one over the same text replays the same
/// events.
#[derive(Debug, Clone)]
pub struct SignatureWalker<'a> {
    input: &'a str,
    pos: usize,
    tasks: Vec<Task<'a>>,
    done: bool,
}

impl<'a> SignatureWalker<'a> {
    pub fn new(input: &'a str, kind: SignatureKind) -> Self {
        let tasks = match kind {
            SignatureKind::Class => vec![
                Task::Interfaces,
                Task::Superclass,
                Task::FormalTypeParameters,
            ],
            SignatureKind::Method => vec![
                Task::Exceptions,
                Task::ReturnType,
                Task::Parameters,
                Task::FormalTypeParameters,
            ],
            SignatureKind::Field => vec![Task::ReferenceType],
        };
        Self {
            input,
            pos: 0,
            tasks,
            done: false,
        }
    }

    pub fn signature(&self) -> &'a str {
        self.input
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, reason: &'static str) -> Error {
        match self.peek() {
            // A stray `>` closes a structure that was never opened.
            Some('>') => Error::unbalanced(self.input, Some(self.pos)),
            Some(_) => Error::invalid_signature(self.input, self.pos, reason),
            None => Error::invalid_signature(self.input, self.pos, "unexpected end of signature"),
        }
    }

    fn expect(&mut self, c: char, reason: &'static str) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.unexpected(reason))
        }
    }

    /// Reads an identifier; `/` is only allowed inside package-qualified class names.
    fn name(&mut self, allow_slash: bool, reason: &'static str) -> Result<&'a str> {
        let input: &'a str = self.input;
        let rest = &input[self.pos..];
        let end = rest
            .find(|c: char| {
                matches!(c, '.' | ';' | '[' | '<' | '>' | ':') || (!allow_slash && c == '/')
            })
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.unexpected(reason));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn step(&mut self) -> Result<Option<SignatureEvent<'a>>> {
        while let Some(task) = self.tasks.pop() {
            if let Some(event) = self.run(task)? {
                return Ok(Some(event));
            }
        }
        if self.pos < self.input.len() {
            return Err(self.unexpected("trailing characters after signature"));
        }
        Ok(None)
    }

    fn run(&mut self, task: Task<'a>) -> Result<Option<SignatureEvent<'a>>> {
        let event = match task {
            Task::Emit(event) => event,
            Task::FormalTypeParameters => {
                if self.eat('<') {
                    self.tasks.push(Task::FormalTypeParameterList { first: true });
                }
                return Ok(None);
            }
            Task::FormalTypeParameterList { first } => {
                if !first && self.eat('>') {
                    return Ok(None);
                }
                if first && self.peek() == Some('>') {
                    return Err(Error::invalid_signature(
                        self.input,
                        self.pos,
                        "empty type parameter list",
                    ));
                }
                let name = self.name(false, "expected a type parameter name")?;
                self.expect(':', "expected `:` after type parameter name")?;
                self.tasks.push(Task::FormalTypeParameterList { first: false });
                self.tasks.push(Task::InterfaceBounds);
                self.tasks.push(Task::ClassBound);
                SignatureEvent::FormalTypeParameter(name)
            }
            Task::ClassBound => {
                if !matches!(self.peek(), Some('L' | 'T' | '[')) {
                    return Ok(None);
                }
                self.tasks.push(Task::ReferenceType);
                SignatureEvent::ClassBound
            }
            Task::InterfaceBounds => {
                if !self.eat(':') {
                    return Ok(None);
                }
                self.tasks.push(Task::InterfaceBounds);
                self.tasks.push(Task::ReferenceType);
                SignatureEvent::InterfaceBound
            }
            Task::Superclass => {
                self.tasks.push(Task::ClassType);
                SignatureEvent::Superclass
            }
            Task::Interfaces => {
                if self.pos >= self.input.len() {
                    return Ok(None);
                }
                self.tasks.push(Task::Interfaces);
                self.tasks.push(Task::ClassType);
                SignatureEvent::Interface
            }
            Task::Parameters => {
                self.expect('(', "expected `(` before method parameters")?;
                self.tasks.push(Task::ParameterList);
                return Ok(None);
            }
            Task::ParameterList => {
                if self.eat(')') {
                    return Ok(None);
                }
                self.tasks.push(Task::ParameterList);
                self.tasks.push(Task::JavaType);
                SignatureEvent::ParameterType
            }
            Task::ReturnType => {
                if self.eat('V') {
                    self.tasks.push(Task::Emit(SignatureEvent::VoidType));
                } else {
                    self.tasks.push(Task::JavaType);
                }
                SignatureEvent::ReturnType
            }
            Task::Exceptions => {
                if !self.eat('^') {
                    return Ok(None);
                }
                match self.peek() {
                    Some('L' | 'T') => {}
                    _ => return Err(self.unexpected("expected an exception type")),
                }
                self.tasks.push(Task::Exceptions);
                self.tasks.push(Task::ReferenceType);
                SignatureEvent::ExceptionType
            }
            Task::JavaType => match self.peek().and_then(BaseType::from_char) {
                Some(base) => {
                    self.pos += 1;
                    SignatureEvent::BaseType(base)
                }
                None => return self.run(Task::ReferenceType),
            },
            Task::ReferenceType => match self.peek() {
                Some('L') => return self.run(Task::ClassType),
                Some('T') => {
                    self.pos += 1;
                    let name = self.name(false, "expected a type variable name")?;
                    self.expect(';', "expected `;` after type variable")?;
                    SignatureEvent::TypeVariable(name)
                }
                Some('[') => {
                    self.pos += 1;
                    self.tasks.push(Task::JavaType);
                    SignatureEvent::ArrayType
                }
                _ => return Err(self.unexpected("expected a reference type")),
            },
            Task::ClassType => {
                self.expect('L', "expected a class type")?;
                let name = self.name(true, "expected a class name")?;
                self.tasks.push(Task::ClassTypeTail);
                SignatureEvent::ClassType(name)
            }
            Task::ClassTypeTail => {
                self.tasks.push(Task::ClassTypeSuffix);
                if self.eat('<') {
                    self.tasks.push(Task::TypeArgumentList { first: true });
                }
                return Ok(None);
            }
            Task::ClassTypeSuffix => {
                if self.eat(';') {
                    SignatureEvent::End
                } else if self.eat('.') {
                    let name = self.name(false, "expected an inner class name")?;
                    self.tasks.push(Task::ClassTypeTail);
                    self.tasks
                        .push(Task::Emit(SignatureEvent::InnerClassType(name)));
                    SignatureEvent::End
                } else {
                    return Err(self.unexpected("expected `;` or `.` after class type"));
                }
            }
            Task::TypeArgumentList { first } => match self.peek() {
                Some('>') if first => {
                    return Err(Error::invalid_signature(
                        self.input,
                        self.pos,
                        "empty type argument list",
                    ))
                }
                Some('>') => {
                    self.pos += 1;
                    return Ok(None);
                }
                Some('*') => {
                    self.pos += 1;
                    self.tasks.push(Task::TypeArgumentList { first: false });
                    SignatureEvent::UnboundedTypeArgument
                }
                Some(c) => {
                    let wildcard = Wildcard::from_char(c);
                    if wildcard != Wildcard::Exact {
                        self.pos += 1;
                    }
                    self.tasks.push(Task::TypeArgumentList { first: false });
                    self.tasks.push(Task::Emit(SignatureEvent::End));
                    self.tasks.push(Task::ReferenceType);
                    SignatureEvent::TypeArgument(wildcard)
                }
                None => return Err(self.unexpected("unterminated type argument list")),
            },
        };
        Ok(Some(event))
    }
}

impl<'a> Iterator for SignatureWalker<'a> {
    type Item = Result<SignatureEvent<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for SignatureWalker<'_> {}
