//! 検証フェーズが報告する診断情報。
//!
//! すべての診断は継続可能であり、検証は診断を蓄積しながら最後まで走査する。

use std::fmt;
use verity_ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
}

impl DiagnosticSeverity {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Information => "info",
        }
    }
}

/// 診断の分類。コードとディスクリプタはこの分類から決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    DuplicateClass,
    AnnotationsUnsupported,
    NotAnAnnotation,
    AnnotationTargetMismatch,
    IllegalDuplicateAnnotation,
    ExplicitContainerConflict,
    MissingOverride,
    AnnotationMemberParameters,
    AnnotationMemberThrows,
    InvalidAnnotationMemberType,
    CircularAnnotationReference,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateClass => "JVV1001",
            DiagnosticKind::AnnotationsUnsupported => "JVV2000",
            DiagnosticKind::NotAnAnnotation => "JVV2001",
            DiagnosticKind::AnnotationTargetMismatch => "JVV2002",
            DiagnosticKind::IllegalDuplicateAnnotation => "JVV2003",
            DiagnosticKind::ExplicitContainerConflict => "JVV2004",
            DiagnosticKind::MissingOverride => "JVV3001",
            DiagnosticKind::AnnotationMemberParameters => "JVV4001",
            DiagnosticKind::AnnotationMemberThrows => "JVV4002",
            DiagnosticKind::InvalidAnnotationMemberType => "JVV4003",
            DiagnosticKind::CircularAnnotationReference => "JVV4004",
        }
    }

    pub fn descriptor(self) -> &'static DiagnosticDescriptor {
        descriptor(self.code()).expect("every diagnostic kind must have a registered descriptor")
    }
}

/// 診断コードと補修ガイダンスをまとめたディスクリプタ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    pub code: &'static str,
    pub title: &'static str,
    pub help: &'static str,
    pub severity: DiagnosticSeverity,
}

pub const ENTRIES: &[DiagnosticDescriptor] = &[
    DiagnosticDescriptor {
        code: "JVV1001",
        title: "Duplicate class definition",
        help: "Two declarations in this compilation share a fully-qualified name. Rename one of them; when a script and a class collide, rename the script file or the class.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV2000",
        title: "Annotations not supported by the target release",
        help: "Annotations require a target release of Java 5 or newer. Raise `target_release` in verity.toml.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV2001",
        title: "Type used as annotation is not an annotation",
        help: "Only `@interface` declarations can be applied as annotations.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV2002",
        title: "Annotation not allowed on this element",
        help: "The annotation's @Target does not include this kind of declaration. Move the annotation or widen its @Target.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV2003",
        title: "Duplicate annotation",
        help: "The annotation is not @Repeatable. Remove the duplicates or declare a container with @Repeatable.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV2004",
        title: "Explicit container conflicts with implicit container",
        help: "Repeated annotations are collected into their container automatically. Remove the explicit container or the repeated annotations.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV3001",
        title: "Method does not override",
        help: "No superclass or interface declares a method with the same parameter types. Fix the signature or remove @Override.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV4001",
        title: "Annotation member with parameters",
        help: "Annotation members are declared without parameters.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV4002",
        title: "Annotation member with throws clause",
        help: "Annotation members cannot declare thrown exceptions.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV4003",
        title: "Invalid annotation member type",
        help: "Annotation members must return a primitive, String, Class, an enum, an annotation, or a one-dimensional array of these.",
        severity: DiagnosticSeverity::Error,
    },
    DiagnosticDescriptor {
        code: "JVV4004",
        title: "Circular annotation reference",
        help: "An annotation member refers back to its own annotation kind, directly or through other annotations.",
        severity: DiagnosticSeverity::Error,
    },
];

/// 診断コードに対応するディスクリプタを取得します。
pub fn descriptor(code: &str) -> Option<&'static DiagnosticDescriptor> {
    ENTRIES.iter().find(|descriptor| descriptor.code == code)
}

/// 検証中に収集される診断。
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    span: Option<Span>,
    unit: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            unit: None,
        }
    }

    pub fn in_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        self.kind.descriptor().severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(unit) = &self.unit {
            write!(f, "{unit}")?;
            if let Some(span) = self.span.as_ref().filter(|span| !span.is_dummy()) {
                write!(f, ":{span}")?;
            }
            f.write_str(": ")?;
        }
        write!(
            f,
            "{} [{}]: {}",
            self.severity().label(),
            self.code(),
            self.message
        )
    }
}
