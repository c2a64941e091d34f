//! Decoded attribute arguments.
//!
//! A [`CustomAttributeValue`] holds the fixed arguments of one attribute, each an
//! [`ArgumentValue`] pairing the declared parameter type with the decoded
//! [`ArgumentData`]. Named arguments are never present; the decoder rejects them.

use std::fmt;

use crate::metadata::{customattributes::LazyString, typesystem::Type};

/// The raw value of one argument, in the representation of its element type
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum ArgumentData<'a> {
    Boolean(bool),
    /// UTF-16 code unit
    Char(u16),
    I1(i8),
    U1(u8),
    I2(i16),
    U2(u16),
    I4(i32),
    U4(u32),
    I8(i64),
    U8(u64),
    R4(f32),
    R8(f64),
    /// `None` for the null string
    String(Option<LazyString<'a>>),
}

impl<'a> ArgumentData<'a> {
    /// The value of an integer argument, sign-extended to 64 bits
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ArgumentData::I1(value) => Some(i64::from(value)),
            ArgumentData::U1(value) => Some(i64::from(value)),
            ArgumentData::I2(value) => Some(i64::from(value)),
            ArgumentData::U2(value) => Some(i64::from(value)),
            ArgumentData::I4(value) => Some(i64::from(value)),
            ArgumentData::U4(value) => Some(i64::from(value)),
            ArgumentData::I8(value) => Some(value),
            ArgumentData::U8(value) => Some(value as i64),
            _ => None,
        }
    }

    /// The string of a string argument; the outer `None` marks a non-string argument
    #[must_use]
    pub fn as_string(&self) -> Option<Option<LazyString<'a>>> {
        match *self {
            ArgumentData::String(value) => Some(value),
            _ => None,
        }
    }

    /// Name of the variant, for error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ArgumentData::Boolean(_) => "Boolean",
            ArgumentData::Char(_) => "Char",
            ArgumentData::I1(_) => "I1",
            ArgumentData::U1(_) => "U1",
            ArgumentData::I2(_) => "I2",
            ArgumentData::U2(_) => "U2",
            ArgumentData::I4(_) => "I4",
            ArgumentData::U4(_) => "U4",
            ArgumentData::I8(_) => "I8",
            ArgumentData::U8(_) => "U8",
            ArgumentData::R4(_) => "R4",
            ArgumentData::R8(_) => "R8",
            ArgumentData::String(_) => "String",
        }
    }
}

impl fmt::Display for ArgumentData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentData::Boolean(value) => write!(f, "{value}"),
            ArgumentData::Char(value) => match char::from_u32(u32::from(*value)) {
                Some(character) => write!(f, "{character:?}"),
                None => write!(f, "{value:#06x}"),
            },
            ArgumentData::I1(value) => write!(f, "{value}"),
            ArgumentData::U1(value) => write!(f, "{value}"),
            ArgumentData::I2(value) => write!(f, "{value}"),
            ArgumentData::U2(value) => write!(f, "{value}"),
            ArgumentData::I4(value) => write!(f, "{value}"),
            ArgumentData::U4(value) => write!(f, "{value}"),
            ArgumentData::I8(value) => write!(f, "{value}"),
            ArgumentData::U8(value) => write!(f, "{value}"),
            ArgumentData::R4(value) => write!(f, "{value}"),
            ArgumentData::R8(value) => write!(f, "{value}"),
            ArgumentData::String(Some(value)) => write!(f, "{:?}", value.to_string()),
            ArgumentData::String(None) => write!(f, "null"),
        }
    }
}

/// One fixed argument
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentValue<'a> {
    /// Declared parameter type of the constructor
    pub ty: Type<'a>,
    /// Parameter name, known only for constructors with `Param` rows
    pub name: Option<&'a str>,
    /// The decoded value
    pub value: ArgumentData<'a>,
}

/// The fixed arguments of one attribute, in constructor parameter order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomAttributeValue<'a> {
    /// The arguments
    pub fixed_args: Vec<ArgumentValue<'a>>,
}

impl<'a> CustomAttributeValue<'a> {
    /// Number of fixed arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixed_args.len()
    }

    /// Returns `true` for attributes without arguments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixed_args.is_empty()
    }

    /// The decoded value of argument `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ArgumentData<'a>> {
        self.fixed_args.get(index).map(|argument| &argument.value)
    }
}

impl fmt::Display for CustomAttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, argument) in self.fixed_args.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", argument.value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::ElementType;

    #[test]
    fn integers() {
        assert_eq!(ArgumentData::I1(-1).as_i64(), Some(-1));
        assert_eq!(ArgumentData::U4(0xAABB_CCDD).as_i64(), Some(0xAABB_CCDD));
        assert_eq!(ArgumentData::U8(u64::MAX).as_i64(), Some(-1));
        assert_eq!(ArgumentData::R8(1.0).as_i64(), None);
        assert_eq!(ArgumentData::Boolean(true).as_i64(), None);
        assert_eq!(ArgumentData::String(None).as_string(), Some(None));
        assert_eq!(ArgumentData::I4(1).as_string(), None);
    }

    #[test]
    fn display() {
        let data = b"MAX_PATH";
        let value = CustomAttributeValue {
            fixed_args: vec![
                ArgumentValue {
                    ty: Type::Primitive(ElementType::String),
                    name: None,
                    value: ArgumentData::String(Some(LazyString::new(data, 0, 8).unwrap())),
                },
                ArgumentValue {
                    ty: Type::Primitive(ElementType::I4),
                    name: Some("count"),
                    value: ArgumentData::I4(-5),
                },
                ArgumentValue {
                    ty: Type::Primitive(ElementType::String),
                    name: None,
                    value: ArgumentData::String(None),
                },
            ],
        };

        assert_eq!(value.to_string(), "(\"MAX_PATH\", -5, null)");
        assert_eq!(value.len(), 3);
        assert_eq!(value.get(1), Some(&ArgumentData::I4(-5)));
        assert!(value.get(3).is_none());
    }
}
