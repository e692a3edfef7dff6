use std::fmt;

use genco::{prelude::*, tokens::ItemStr};

/// Represents a Go type in the code generation system.
///
/// This enum covers the basic Go types plus the composite forms the
/// transformer needs when lowering IL expressions: slices, maps, pointers,
/// function types and user-defined (named) types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// Boolean type
    Bool,
    /// Platform-sized signed integer
    Int,
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// Platform-sized unsigned integer
    Uint,
    /// Unsigned 8-bit integer
    Uint8,
    /// Unsigned 16-bit integer
    Uint16,
    /// Unsigned 32-bit integer
    Uint32,
    /// Unsigned 64-bit integer
    Uint64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// String type
    String,
    /// Error type
    Error,
    /// Empty interface, spelled `interface{}`
    Interface,
    /// Empty interface, spelled `any`
    Any,
    /// Pointer to another type
    Pointer(Box<GoType>),
    /// Slice of another type
    Slice(Box<GoType>),
    /// Map from a key type to a value type
    Map(Box<GoType>, Box<GoType>),
    /// Function type with parameter and result types
    Func(Vec<GoType>, Option<Box<GoType>>),
    /// User-defined type (structs, enums, type aliases)
    Named(String),
    /// Represents no value/void
    Nothing,
}

impl GoType {
    /// Creates a slice type with the given element type.
    pub fn slice(element: GoType) -> Self {
        GoType::Slice(Box::new(element))
    }

    /// Creates a map type with the given key and value types.
    pub fn map(key: GoType, value: GoType) -> Self {
        GoType::Map(Box::new(key), Box::new(value))
    }

    /// Creates a pointer type to the given pointee.
    pub fn pointer(pointee: GoType) -> Self {
        GoType::Pointer(Box::new(pointee))
    }

    /// Creates a named (user-defined) type.
    pub fn named<T: Into<String>>(name: T) -> Self {
        GoType::Named(name.into())
    }

    /// The conventional byte-slice type, `[]uint8`.
    pub fn bytes() -> Self {
        GoType::slice(GoType::Uint8)
    }

    /// The dynamic map type used for untyped object literals.
    pub fn string_map() -> Self {
        GoType::map(GoType::String, GoType::Interface)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            GoType::Int
                | GoType::Int8
                | GoType::Int16
                | GoType::Int32
                | GoType::Int64
                | GoType::Uint
                | GoType::Uint8
                | GoType::Uint16
                | GoType::Uint32
                | GoType::Uint64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, GoType::Float32 | GoType::Float64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            GoType::Uint | GoType::Uint8 | GoType::Uint16 | GoType::Uint32 | GoType::Uint64
        )
    }

    /// True for `interface{}` and `any`.
    pub fn is_interface(&self) -> bool {
        matches!(self, GoType::Interface | GoType::Any)
    }

    pub fn is_slice(&self) -> bool {
        matches!(self, GoType::Slice(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, GoType::Map(_, _))
    }

    /// True for types whose zero value is `nil`.
    pub fn is_nilable(&self) -> bool {
        matches!(
            self,
            GoType::Interface
                | GoType::Any
                | GoType::Error
                | GoType::Pointer(_)
                | GoType::Slice(_)
                | GoType::Map(_, _)
                | GoType::Func(_, _)
        )
    }

    pub fn is_byte_slice(&self) -> bool {
        matches!(self, GoType::Slice(element) if **element == GoType::Uint8)
    }

    /// The element type of a slice, or the value type of a map.
    pub fn element_type(&self) -> Option<&GoType> {
        match self {
            GoType::Slice(element) => Some(element),
            GoType::Map(_, value) => Some(value),
            _ => None,
        }
    }

    /// Integer width in bits. `int`/`uint` count as word-sized (64).
    pub fn bit_width(&self) -> Option<u8> {
        match self {
            GoType::Int8 | GoType::Uint8 => Some(8),
            GoType::Int16 | GoType::Uint16 => Some(16),
            GoType::Int32 | GoType::Uint32 => Some(32),
            GoType::Int64 | GoType::Uint64 | GoType::Int | GoType::Uint => Some(64),
            _ => None,
        }
    }

    /// The unsigned integer type of the same width.
    pub fn unsigned_counterpart(&self) -> GoType {
        match self {
            GoType::Int8 => GoType::Uint8,
            GoType::Int16 => GoType::Uint16,
            GoType::Int32 => GoType::Uint32,
            GoType::Int64 => GoType::Uint64,
            GoType::Int => GoType::Uint,
            other => other.clone(),
        }
    }

    /// Ordering rank used when two call sites disagree on a parameter type:
    /// the wider type wins; an interface loses to any concrete type.
    pub fn widening_rank(&self) -> u8 {
        match self {
            GoType::Interface | GoType::Any => 0,
            GoType::Bool => 1,
            GoType::Uint8 | GoType::Int8 => 2,
            GoType::Uint16 | GoType::Int16 => 3,
            GoType::Uint32 | GoType::Int32 => 4,
            GoType::Int | GoType::Uint => 5,
            GoType::Int64 | GoType::Uint64 => 6,
            GoType::Float32 => 7,
            GoType::Float64 => 8,
            _ => 9,
        }
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Bool => f.write_str("bool"),
            GoType::Int => f.write_str("int"),
            GoType::Int8 => f.write_str("int8"),
            GoType::Int16 => f.write_str("int16"),
            GoType::Int32 => f.write_str("int32"),
            GoType::Int64 => f.write_str("int64"),
            GoType::Uint => f.write_str("uint"),
            GoType::Uint8 => f.write_str("uint8"),
            GoType::Uint16 => f.write_str("uint16"),
            GoType::Uint32 => f.write_str("uint32"),
            GoType::Uint64 => f.write_str("uint64"),
            GoType::Float32 => f.write_str("float32"),
            GoType::Float64 => f.write_str("float64"),
            GoType::String => f.write_str("string"),
            GoType::Error => f.write_str("error"),
            GoType::Interface => f.write_str("interface{}"),
            GoType::Any => f.write_str("any"),
            GoType::Pointer(pointee) => write!(f, "*{pointee}"),
            GoType::Slice(element) => write!(f, "[]{element}"),
            GoType::Map(key, value) => write!(f, "map[{key}]{value}"),
            GoType::Func(params, result) => {
                f.write_str("func(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                f.write_str(")")?;
                if let Some(result) = result {
                    write!(f, " {result}")?;
                }
                Ok(())
            }
            GoType::Named(name) => f.write_str(name),
            GoType::Nothing => Ok(()),
        }
    }
}

impl FormatInto<Go> for &GoType {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        tokens.append(ItemStr::from(self.to_string()));
    }
}

impl FormatInto<Go> for GoType {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        (&self).format_into(tokens)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::GoType;

    #[test]
    fn test_basic_types() {
        let cases = vec![
            (GoType::Bool, "bool"),
            (GoType::Int, "int"),
            (GoType::Uint8, "uint8"),
            (GoType::Uint16, "uint16"),
            (GoType::Uint32, "uint32"),
            (GoType::Uint64, "uint64"),
            (GoType::Int8, "int8"),
            (GoType::Int16, "int16"),
            (GoType::Int32, "int32"),
            (GoType::Int64, "int64"),
            (GoType::Float32, "float32"),
            (GoType::Float64, "float64"),
            (GoType::String, "string"),
            (GoType::Error, "error"),
            (GoType::Interface, "interface{}"),
            (GoType::Any, "any"),
            (GoType::Nothing, ""),
        ];

        for (typ, expected) in cases {
            assert_eq!(typ.to_string(), expected, "Failed for type: {:?}", typ);
        }
    }

    #[test]
    fn test_composite_types() {
        assert_eq!(GoType::bytes().to_string(), "[]uint8");
        assert_eq!(
            GoType::pointer(GoType::named("Foo")).to_string(),
            "*Foo"
        );
        assert_eq!(GoType::string_map().to_string(), "map[string]interface{}");
        assert_eq!(
            GoType::slice(GoType::slice(GoType::Uint32)).to_string(),
            "[][]uint32"
        );
        assert_eq!(
            GoType::Func(vec![GoType::Uint8], Some(Box::new(GoType::Uint8))).to_string(),
            "func(uint8) uint8"
        );
    }

    #[test]
    fn test_equality_follows_stringification() {
        assert_eq!(GoType::bytes(), GoType::slice(GoType::Uint8));
        assert_ne!(GoType::Interface, GoType::Any);
        assert_ne!(GoType::Uint32, GoType::Int32);
    }

    #[test]
    fn test_unsigned_counterpart() {
        assert_eq!(GoType::Int32.unsigned_counterpart(), GoType::Uint32);
        assert_eq!(GoType::Int.unsigned_counterpart(), GoType::Uint);
        assert_eq!(GoType::Uint8.unsigned_counterpart(), GoType::Uint8);
    }

    #[test]
    fn test_nilable() {
        assert!(GoType::bytes().is_nilable());
        assert!(GoType::Interface.is_nilable());
        assert!(GoType::string_map().is_nilable());
        assert!(!GoType::Uint32.is_nilable());
        assert!(!GoType::named("BaseAlgorithm").is_nilable());
        assert!(GoType::pointer(GoType::named("BaseAlgorithm")).is_nilable());
    }
}
