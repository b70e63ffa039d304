//! 実行環境の JDK メタデータが得られない場合に使うフォールバック型。
//!
//! `java.lang.Object` と、検証が参照する標準メタ注釈のみを収録する。

use once_cell::sync::Lazy;
use verity_ast::{
    Annotation, AnnotationTarget, ClassDecl, ClassKind, Expression, MethodDecl, OBJECT_CLASS,
    Parameter, RETENTION_ANNOTATION, RetentionPolicy, Span, TARGET_ANNOTATION, TypeRef,
    VALUE_MEMBER, WildcardKind,
};

const ELEMENT_TYPE: &str = "java.lang.annotation.ElementType";
const RETENTION_POLICY: &str = "java.lang.annotation.RetentionPolicy";

#[derive(Debug, Clone, Copy)]
struct JdkAnnotation {
    fqcn: &'static str,
    retention: RetentionPolicy,
    /// 空なら `@Target` を付けない。
    targets: &'static [AnnotationTarget],
}

const JDK_ANNOTATIONS: &[JdkAnnotation] = &[
    JdkAnnotation {
        fqcn: "java.lang.Override",
        retention: RetentionPolicy::Source,
        targets: &[AnnotationTarget::Method],
    },
    JdkAnnotation {
        fqcn: "java.lang.Deprecated",
        retention: RetentionPolicy::Runtime,
        targets: &[
            AnnotationTarget::Constructor,
            AnnotationTarget::Field,
            AnnotationTarget::LocalVariable,
            AnnotationTarget::Method,
            AnnotationTarget::Package,
            AnnotationTarget::Parameter,
            AnnotationTarget::Type,
        ],
    },
    JdkAnnotation {
        fqcn: "java.lang.SuppressWarnings",
        retention: RetentionPolicy::Source,
        targets: &[
            AnnotationTarget::Type,
            AnnotationTarget::Field,
            AnnotationTarget::Method,
            AnnotationTarget::Parameter,
            AnnotationTarget::Constructor,
            AnnotationTarget::LocalVariable,
        ],
    },
    JdkAnnotation {
        fqcn: "java.lang.FunctionalInterface",
        retention: RetentionPolicy::Runtime,
        targets: &[AnnotationTarget::Type],
    },
    JdkAnnotation {
        fqcn: "java.lang.SafeVarargs",
        retention: RetentionPolicy::Runtime,
        targets: &[AnnotationTarget::Constructor, AnnotationTarget::Method],
    },
    JdkAnnotation {
        fqcn: "java.lang.annotation.Target",
        retention: RetentionPolicy::Runtime,
        targets: &[AnnotationTarget::AnnotationType],
    },
    JdkAnnotation {
        fqcn: "java.lang.annotation.Retention",
        retention: RetentionPolicy::Runtime,
        targets: &[AnnotationTarget::AnnotationType],
    },
    JdkAnnotation {
        fqcn: "java.lang.annotation.Repeatable",
        retention: RetentionPolicy::Runtime,
        targets: &[AnnotationTarget::AnnotationType],
    },
    JdkAnnotation {
        fqcn: "java.lang.annotation.Documented",
        retention: RetentionPolicy::Runtime,
        targets: &[AnnotationTarget::AnnotationType],
    },
    JdkAnnotation {
        fqcn: "java.lang.annotation.Inherited",
        retention: RetentionPolicy::Runtime,
        targets: &[AnnotationTarget::AnnotationType],
    },
];

static JDK_CLASSES: Lazy<Vec<ClassDecl>> = Lazy::new(|| {
    let mut classes = vec![object_class()];
    classes.extend(JDK_ANNOTATIONS.iter().map(annotation_class));
    classes
});

/// フォールバック型の宣言一覧を返す。
pub fn jdk_classes() -> &'static [ClassDecl] {
    &JDK_CLASSES
}

fn object_class() -> ClassDecl {
    let object = TypeRef::object();
    let mut class = ClassDecl::new(OBJECT_CLASS, ClassKind::Class);
    class.methods = vec![
        MethodDecl::new(
            "equals",
            vec![Parameter::new("obj", object.clone())],
            TypeRef::primitive("boolean"),
        ),
        MethodDecl::new("hashCode", vec![], TypeRef::primitive("int")),
        MethodDecl::new("toString", vec![], TypeRef::class("java.lang.String")),
        MethodDecl::new("clone", vec![], object),
        MethodDecl::new("finalize", vec![], TypeRef::Void),
        MethodDecl::new(
            "getClass",
            vec![],
            TypeRef::parameterized(
                "java.lang.Class",
                vec![TypeRef::Wildcard {
                    kind: WildcardKind::Unbounded,
                    bound: None,
                }],
            ),
        ),
    ];
    class
}

fn annotation_class(entry: &JdkAnnotation) -> ClassDecl {
    let mut class = ClassDecl::new(entry.fqcn, ClassKind::Annotation);
    class.annotations.push(
        Annotation::new(RETENTION_ANNOTATION, Span::dummy())
            .with_retention(RetentionPolicy::Runtime)
            .with_member(
                VALUE_MEMBER,
                Expression::enum_constant(RETENTION_POLICY, entry.retention.constant_name()),
            ),
    );
    if !entry.targets.is_empty() {
        let targets = entry
            .targets
            .iter()
            .map(|target| Expression::enum_constant(ELEMENT_TYPE, target.element_type_name()))
            .collect();
        class.annotations.push(
            Annotation::new(TARGET_ANNOTATION, Span::dummy())
                .with_retention(RetentionPolicy::Runtime)
                .with_member(VALUE_MEMBER, Expression::list(targets)),
        );
    }
    class
}
