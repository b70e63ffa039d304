//! 注釈定義から一度だけ導出されるメタデータ。

use verity_ast::{
    AnnotationTarget, ClassDecl, Expression, REPEATABLE_ANNOTATION, RETENTION_ANNOTATION,
    RetentionPolicy, TARGET_ANNOTATION, TargetSet, VALUE_MEMBER, WellKnownAnnotation,
};

/// 注釈種別に宣言された `@Retention`。
#[derive(Debug, Clone, PartialEq)]
pub enum RetentionDecl {
    /// `@Retention` なし。保持ポリシーは不明として扱い、注釈には記録しない。
    Implicit,
    /// 列挙定数から直接読み取れたもの。
    Policy(RetentionPolicy),
    /// それ以外の式。メンバ値の評価器が必要。
    Deferred(Expression),
}

/// 注釈種別のメタデータ: 保持ポリシー、適用先、繰り返し時のコンテナ。
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationKind {
    pub name: String,
    pub well_known: WellKnownAnnotation,
    pub retention: RetentionDecl,
    pub targets: TargetSet,
    /// `@Repeatable(Container.class)` が指すコンテナ。
    pub repeatable_container: Option<String>,
}

impl AnnotationKind {
    /// 注釈定義のメタ注釈を読み取り、種別情報を構築する。
    pub fn from_declaration(decl: &ClassDecl) -> Self {
        let retention = decl
            .annotations_of(RETENTION_ANNOTATION)
            .find_map(|annotation| annotation.member(VALUE_MEMBER))
            .map(retention_from_value)
            .unwrap_or(RetentionDecl::Implicit);

        let targets = decl
            .annotations_of(TARGET_ANNOTATION)
            .find_map(|annotation| annotation.member(VALUE_MEMBER))
            .map(targets_from_value)
            .unwrap_or_else(TargetSet::all_declarations);

        let repeatable_container = decl
            .annotations_of(REPEATABLE_ANNOTATION)
            .find_map(|annotation| match annotation.member(VALUE_MEMBER) {
                Some(Expression::ClassLiteral { ty, .. }) => ty.class_name().map(str::to_string),
                _ => None,
            });

        Self {
            name: decl.name.clone(),
            well_known: WellKnownAnnotation::classify(&decl.name),
            retention,
            targets,
            repeatable_container,
        }
    }

    /// 式を評価せずに読み取れる保持ポリシー。
    pub fn declared_retention(&self) -> Option<RetentionPolicy> {
        match &self.retention {
            RetentionDecl::Policy(policy) => Some(*policy),
            RetentionDecl::Implicit | RetentionDecl::Deferred(_) => None,
        }
    }
}

fn retention_from_value(value: &Expression) -> RetentionDecl {
    match value {
        Expression::EnumConstant { constant, .. } => RetentionPolicy::from_constant(constant)
            .map(RetentionDecl::Policy)
            .unwrap_or_else(|| RetentionDecl::Deferred(value.clone())),
        other => RetentionDecl::Deferred(other.clone()),
    }
}

fn targets_from_value(value: &Expression) -> TargetSet {
    value
        .elements()
        .iter()
        .filter_map(|element| match element {
            Expression::EnumConstant { constant, .. } => {
                AnnotationTarget::from_element_type(constant)
            }
            _ => None,
        })
        .collect()
}
