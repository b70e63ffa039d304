use crate::{Annotation, Literal, Span, Statement, TypeRef};
use serde::{Deserialize, Serialize};

/// Expressions that may appear as annotation member values, default values,
/// initializers, or return values.
///
/// Only the forms the declaration verifier inspects are modelled; any other
/// expression is carried as `Opaque`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal {
        value: Literal,
        #[serde(default)]
        span: Span,
    },
    /// Qualified enum constant such as `RetentionPolicy.RUNTIME`.
    EnumConstant {
        type_name: String,
        constant: String,
        #[serde(default)]
        span: Span,
    },
    /// `Foo.class`
    ClassLiteral {
        ty: TypeRef,
        #[serde(default)]
        span: Span,
    },
    /// Reference to a named constant that needs evaluation (`Policies.DEFAULT`).
    Constant {
        name: String,
        #[serde(default)]
        span: Span,
    },
    /// Nested annotation value.
    Annotation(Box<Annotation>),
    /// Array initializer `{ a, b }`.
    List {
        elements: Vec<Expression>,
        #[serde(default)]
        span: Span,
    },
    /// Closure or lambda body, which may contain nested declarations.
    Closure {
        body: Vec<Statement>,
        #[serde(default)]
        span: Span,
    },
    Opaque {
        #[serde(default)]
        span: Span,
    },
}

impl Expression {
    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal {
            value: Literal::String(value.into()),
            span: Span::dummy(),
        }
    }

    pub fn enum_constant(type_name: impl Into<String>, constant: impl Into<String>) -> Self {
        Expression::EnumConstant {
            type_name: type_name.into(),
            constant: constant.into(),
            span: Span::dummy(),
        }
    }

    pub fn class_literal(ty: TypeRef) -> Self {
        Expression::ClassLiteral {
            ty,
            span: Span::dummy(),
        }
    }

    pub fn annotation(annotation: Annotation) -> Self {
        Expression::Annotation(Box::new(annotation))
    }

    pub fn list(elements: Vec<Expression>) -> Self {
        Expression::List {
            elements,
            span: Span::dummy(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expression::Annotation(annotation) => &annotation.span,
            Expression::Literal { span, .. }
            | Expression::EnumConstant { span, .. }
            | Expression::ClassLiteral { span, .. }
            | Expression::Constant { span, .. }
            | Expression::List { span, .. }
            | Expression::Closure { span, .. }
            | Expression::Opaque { span } => span,
        }
    }

    pub fn as_annotation(&self) -> Option<&Annotation> {
        match self {
            Expression::Annotation(annotation) => Some(annotation),
            _ => None,
        }
    }

    /// Values of an array initializer, or the expression itself for a single value.
    pub fn elements(&self) -> &[Expression] {
        match self {
            Expression::List { elements, .. } => elements,
            other => std::slice::from_ref(other),
        }
    }

    /// Short rendering used in diagnostics.
    pub fn text(&self) -> String {
        match self {
            Expression::Literal { value, .. } => match value {
                Literal::String(text) => format!("\"{text}\""),
                Literal::Number(text) => text.clone(),
                Literal::Boolean(flag) => flag.to_string(),
                Literal::Character(ch) => format!("'{ch}'"),
                Literal::Null => "null".to_string(),
            },
            Expression::EnumConstant {
                type_name,
                constant,
                ..
            } => format!("{type_name}.{constant}"),
            Expression::ClassLiteral { ty, .. } => format!("{ty}.class"),
            Expression::Constant { name, .. } => name.clone(),
            Expression::Annotation(annotation) => format!("@{}", annotation.kind),
            Expression::List { elements, .. } => {
                let rendered = elements
                    .iter()
                    .map(Expression::text)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{rendered}]")
            }
            Expression::Closure { .. } => "{ -> ... }".to_string(),
            Expression::Opaque { .. } => "<expression>".to_string(),
        }
    }
}
