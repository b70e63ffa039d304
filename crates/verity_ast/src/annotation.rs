use crate::{Expression, Span};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const OVERRIDE_ANNOTATION: &str = "java.lang.Override";
pub const DEPRECATED_ANNOTATION: &str = "java.lang.Deprecated";
pub const TARGET_ANNOTATION: &str = "java.lang.annotation.Target";
pub const RETENTION_ANNOTATION: &str = "java.lang.annotation.Retention";
pub const REPEATABLE_ANNOTATION: &str = "java.lang.annotation.Repeatable";

/// Member name used by single-valued annotations and implicit containers.
pub const VALUE_MEMBER: &str = "value";

/// Structured representation of an annotation applied to a declaration.
///
/// `retention` and `targets` are filled in once the annotation kind has been
/// resolved; a freshly parsed annotation usually carries neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Fully-qualified name of the annotation kind.
    pub kind: String,
    #[serde(default)]
    pub members: IndexMap<String, Expression>,
    #[serde(default)]
    pub retention: Option<RetentionPolicy>,
    #[serde(default)]
    pub targets: Option<TargetSet>,
    #[serde(default)]
    pub span: Span,
}

impl Annotation {
    pub fn new(kind: impl Into<String>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            members: IndexMap::new(),
            retention: None,
            targets: None,
            span,
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: Expression) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = Some(retention);
        self
    }

    pub fn member(&self, name: &str) -> Option<&Expression> {
        self.members.get(name)
    }

    pub fn simple_name(&self) -> &str {
        self.kind.rsplit('.').next().unwrap_or(&self.kind)
    }

    pub fn has_source_retention(&self) -> bool {
        self.retention == Some(RetentionPolicy::Source)
    }
}

/// `java.lang.annotation.RetentionPolicy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetentionPolicy {
    Source,
    Class,
    Runtime,
}

impl RetentionPolicy {
    pub fn from_constant(name: &str) -> Option<Self> {
        match name.rsplit('.').next().unwrap_or(name) {
            "SOURCE" => Some(RetentionPolicy::Source),
            "CLASS" => Some(RetentionPolicy::Class),
            "RUNTIME" => Some(RetentionPolicy::Runtime),
            _ => None,
        }
    }

    pub fn constant_name(self) -> &'static str {
        match self {
            RetentionPolicy::Source => "SOURCE",
            RetentionPolicy::Class => "CLASS",
            RetentionPolicy::Runtime => "RUNTIME",
        }
    }

    /// Rank used when several retentions have to be merged: class > runtime > source.
    fn precedence(self) -> u8 {
        match self {
            RetentionPolicy::Class => 2,
            RetentionPolicy::Runtime => 1,
            RetentionPolicy::Source => 0,
        }
    }

    pub fn strongest(self, other: Self) -> Self {
        if other.precedence() > self.precedence() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_name())
    }
}

/// `java.lang.annotation.ElementType` restricted to what declarations can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnnotationTarget {
    Type,
    Field,
    Method,
    Parameter,
    Constructor,
    LocalVariable,
    AnnotationType,
    Package,
    TypeParameter,
    TypeUse,
}

impl AnnotationTarget {
    pub const DECLARATIONS: [AnnotationTarget; 8] = [
        AnnotationTarget::Type,
        AnnotationTarget::Field,
        AnnotationTarget::Method,
        AnnotationTarget::Parameter,
        AnnotationTarget::Constructor,
        AnnotationTarget::LocalVariable,
        AnnotationTarget::AnnotationType,
        AnnotationTarget::Package,
    ];

    pub fn element_type_name(self) -> &'static str {
        match self {
            AnnotationTarget::Type => "TYPE",
            AnnotationTarget::Field => "FIELD",
            AnnotationTarget::Method => "METHOD",
            AnnotationTarget::Parameter => "PARAMETER",
            AnnotationTarget::Constructor => "CONSTRUCTOR",
            AnnotationTarget::LocalVariable => "LOCAL_VARIABLE",
            AnnotationTarget::AnnotationType => "ANNOTATION_TYPE",
            AnnotationTarget::Package => "PACKAGE",
            AnnotationTarget::TypeParameter => "TYPE_PARAMETER",
            AnnotationTarget::TypeUse => "TYPE_USE",
        }
    }

    pub fn from_element_type(name: &str) -> Option<Self> {
        let constant = name.rsplit('.').next().unwrap_or(name);
        match constant {
            "TYPE" => Some(AnnotationTarget::Type),
            "FIELD" => Some(AnnotationTarget::Field),
            "METHOD" => Some(AnnotationTarget::Method),
            "PARAMETER" => Some(AnnotationTarget::Parameter),
            "CONSTRUCTOR" => Some(AnnotationTarget::Constructor),
            "LOCAL_VARIABLE" => Some(AnnotationTarget::LocalVariable),
            "ANNOTATION_TYPE" => Some(AnnotationTarget::AnnotationType),
            "PACKAGE" => Some(AnnotationTarget::Package),
            "TYPE_PARAMETER" => Some(AnnotationTarget::TypeParameter),
            "TYPE_USE" => Some(AnnotationTarget::TypeUse),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_type_name())
    }
}

/// Set of element kinds an annotation kind may be applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSet(BTreeSet<AnnotationTarget>);

impl TargetSet {
    pub fn new(targets: impl IntoIterator<Item = AnnotationTarget>) -> Self {
        Self(targets.into_iter().collect())
    }

    /// Targets of an annotation kind without an explicit `@Target`.
    pub fn all_declarations() -> Self {
        Self::new(AnnotationTarget::DECLARATIONS)
    }

    /// Whether an annotation restricted to this set may appear on `target`.
    ///
    /// Annotation definitions are types, and `TYPE_USE` covers type and type
    /// parameter declarations.
    pub fn allows(&self, target: AnnotationTarget) -> bool {
        if self.0.contains(&target) {
            return true;
        }
        match target {
            AnnotationTarget::AnnotationType => {
                self.0.contains(&AnnotationTarget::Type)
                    || self.0.contains(&AnnotationTarget::TypeUse)
            }
            AnnotationTarget::Type | AnnotationTarget::TypeParameter => {
                self.0.contains(&AnnotationTarget::TypeUse)
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = AnnotationTarget> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<AnnotationTarget> for TargetSet {
    fn from_iter<I: IntoIterator<Item = AnnotationTarget>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Closed classification of the annotation kinds the verifier reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WellKnownAnnotation {
    Override,
    Deprecated,
    Target,
    Retention,
    Repeatable,
    Other,
}

impl WellKnownAnnotation {
    pub fn classify(kind: &str) -> Self {
        match kind {
            OVERRIDE_ANNOTATION => WellKnownAnnotation::Override,
            DEPRECATED_ANNOTATION => WellKnownAnnotation::Deprecated,
            TARGET_ANNOTATION => WellKnownAnnotation::Target,
            RETENTION_ANNOTATION => WellKnownAnnotation::Retention,
            REPEATABLE_ANNOTATION => WellKnownAnnotation::Repeatable,
            _ => WellKnownAnnotation::Other,
        }
    }
}
