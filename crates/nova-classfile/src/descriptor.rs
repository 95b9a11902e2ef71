use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'B' => BaseType::Byte,
            'C' => BaseType::Char,
            'D' => BaseType::Double,
            'F' => BaseType::Float,
            'I' => BaseType::Int,
            'J' => BaseType::Long,
            'S' => BaseType::Short,
            'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Internal name of a class or interface type (`java/lang/String`).
    ///
    /// Primitive and array types have no internal name.
    pub fn internal_name(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            FieldType::Base(_) | FieldType::Array(_) => None,
        }
    }

    /// Removes `dims` array dimensions, returning `None` if the type has fewer.
    pub fn element_type(&self, dims: usize) -> Option<&FieldType> {
        let mut ty = self;
        for _ in 0..dims {
            match ty {
                FieldType::Array(component) => ty = component.as_ref(),
                _ => return None,
            }
        }
        Some(ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

impl ReturnType {
    pub fn as_field_type(&self) -> Option<&FieldType> {
        match self {
            ReturnType::Void => None,
            ReturnType::Type(ty) => Some(ty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut parser = DescriptorParser::new(desc);
    let ty = parser.field_type()?;
    parser.expect_end()?;
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let mut parser = DescriptorParser::new(desc);
    parser.expect('(')?;

    let mut params = Vec::new();
    while parser.peek() != Some(')') {
        params.push(parser.field_type()?);
    }
    parser.expect(')')?;

    let return_type = if parser.eat('V') {
        ReturnType::Void
    } else {
        ReturnType::Type(parser.field_type()?)
    };
    parser.expect_end()?;

    Ok(MethodDescriptor { params, return_type })
}

struct DescriptorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> DescriptorParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self) -> Error {
        Error::InvalidDescriptor(self.input.to_string())
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

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn expect_end(&self) -> Result<()> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn field_type(&mut self) -> Result<FieldType> {
        let mut dims = 0usize;
        while self.eat('[') {
            dims += 1;
        }

        let c = self.peek().ok_or_else(|| self.error())?;
        let mut ty = if let Some(base) = BaseType::from_char(c) {
            self.pos += 1;
            FieldType::Base(base)
        } else if c == 'L' {
            let rest = &self.input[self.pos + 1..];
            let end = rest.find(';').ok_or_else(|| self.error())?;
            let name = &rest[..end];
            if name.is_empty() {
                return Err(self.error());
            }
            self.pos += end + 2;
            FieldType::Object(name.to_string())
        } else {
            return Err(self.error());
        };

        for _ in 0..dims {
            ty = FieldType::Array(Box::new(ty));
        }
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_field_types() {
        assert_eq!(parse_field_descriptor("J").unwrap(), FieldType::Base(BaseType::Long));
        let ty = parse_field_descriptor("[Ljava/util/Optional;").unwrap();
        assert_eq!(
            ty,
            FieldType::Array(Box::new(FieldType::Object("java/util/Optional".to_string())))
        );
        assert_eq!(ty.element_type(1).and_then(FieldType::internal_name), Some("java/util/Optional"));
    }

    #[test]
    fn accessor_and_canonical_constructor() {
        let accessor = parse_method_descriptor("()Ljava/lang/Comparable;").unwrap();
        assert!(accessor.params.is_empty());
        assert_eq!(
            accessor.return_type.as_field_type().and_then(FieldType::internal_name),
            Some("java/lang/Comparable")
        );

        let ctor = parse_method_descriptor("(Z[DLjava/lang/Number;)V").unwrap();
        assert_eq!(ctor.params.len(), 3);
        assert_eq!(ctor.params[0], FieldType::Base(BaseType::Boolean));
        assert_eq!(ctor.params[2].internal_name(), Some("java/lang/Number"));
        assert_eq!(ctor.return_type, ReturnType::Void);
        assert_eq!(ctor.return_type.as_field_type(), None);
    }

    #[test]
    fn rejects_trailing_and_truncated_input() {
        assert!(parse_field_descriptor("Ljava/lang/String").is_err());
        assert!(parse_field_descriptor("II").is_err());
        assert!(parse_field_descriptor("L;").is_err());
        assert!(parse_method_descriptor("(I").is_err());
        assert!(parse_method_descriptor("()").is_err());
        assert!(parse_method_descriptor("()VV").is_err());
    }

    #[test]
    fn element_type_peels_dimensions() {
        let ty = parse_field_descriptor("[[Ljava/lang/Comparable;").unwrap();
        assert_eq!(ty.internal_name(), None);
        assert_eq!(ty.element_type(1).and_then(FieldType::internal_name), None);
        assert_eq!(
            ty.element_type(2).and_then(FieldType::internal_name),
            Some("java/lang/Comparable")
        );
        assert_eq!(ty.element_type(3), None);
    }
}
