use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully-qualified name of the root class every class implicitly extends.
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// Source position information
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Span {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    pub fn dummy() -> Self {
        Self::default()
    }

    pub fn is_dummy(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// Variance kind for Java wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardKind {
    Unbounded,
    Extends,
    Super,
}

/// Type reference as written at a use site (field type, parameter, supertype, ...).
///
/// Class names are expected to be fully qualified once name resolution ran.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Primitive types: int, boolean, char, etc.
    Primitive(String),
    /// Reference types, optionally parameterized: `java.util.List<T>`
    Class {
        name: String,
        #[serde(default)]
        type_arguments: Vec<TypeRef>,
    },
    /// Reference to a type parameter in scope (`T`, `E`).
    Variable(String),
    /// Array types: `T[]`
    Array(Box<TypeRef>),
    /// Wildcard generic (e.g., `? extends Number`).
    Wildcard {
        kind: WildcardKind,
        #[serde(default)]
        bound: Option<Box<TypeRef>>,
    },
    Void,
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn parameterized(name: impl Into<String>, type_arguments: Vec<TypeRef>) -> Self {
        TypeRef::Class {
            name: name.into(),
            type_arguments,
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeRef::Variable(name.into())
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        TypeRef::Primitive(name.into())
    }

    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn object() -> Self {
        TypeRef::class(OBJECT_CLASS)
    }

    /// Name of the referenced class, if this is a class reference.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Class { type_arguments, .. } => type_arguments,
            _ => &[],
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    pub fn array_dimensions(&self) -> usize {
        match self {
            TypeRef::Array(element) => 1 + element.array_dimensions(),
            _ => 0,
        }
    }

    /// Innermost element type of an array, or the type itself.
    pub fn element_type(&self) -> &TypeRef {
        match self {
            TypeRef::Array(element) => element.element_type(),
            other => other,
        }
    }

    /// Strips type arguments and collapses wildcards onto their bound.
    ///
    /// Type variables keep their name; resolving them to a bound is the job of
    /// the substitution performed by the caller.
    pub fn erasure(&self) -> TypeRef {
        match self {
            TypeRef::Class { name, .. } => TypeRef::class(name.clone()),
            TypeRef::Array(element) => TypeRef::array_of(element.erasure()),
            TypeRef::Wildcard {
                kind: WildcardKind::Extends,
                bound: Some(bound),
            } => bound.erasure(),
            TypeRef::Wildcard { .. } => TypeRef::object(),
            other => other.clone(),
        }
    }

    pub fn same_erasure(&self, other: &TypeRef) -> bool {
        self.erasure() == other.erasure()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(name) | TypeRef::Variable(name) => f.write_str(name),
            TypeRef::Class {
                name,
                type_arguments,
            } => {
                f.write_str(name)?;
                if !type_arguments.is_empty() {
                    f.write_str("<")?;
                    for (index, argument) in type_arguments.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{argument}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::Wildcard { kind, bound } => match (kind, bound) {
                (WildcardKind::Extends, Some(bound)) => write!(f, "? extends {bound}"),
                (WildcardKind::Super, Some(bound)) => write!(f, "? super {bound}"),
                _ => f.write_str("?"),
            },
            TypeRef::Void => f.write_str("void"),
        }
    }
}

/// Declared type parameter with optional upper bounds: `<T extends Comparable<T>>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<TypeRef>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// Type used in place of the parameter when the declaring type is used raw.
    pub fn erasure(&self) -> TypeRef {
        self.bounds
            .first()
            .map(TypeRef::erasure)
            .unwrap_or_else(TypeRef::object)
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Number(String), // Keep as string for precision
    Boolean(bool),
    Character(char),
    Null,
}
