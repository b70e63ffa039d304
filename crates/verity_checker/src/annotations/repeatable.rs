//! 繰り返し注釈の暗黙コンテナへの畳み込み。

use super::evaluator::MemberValueEvaluator;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::registry::{AnnotationKind, ClassRegistry, RetentionDecl};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;
use verity_ast::{Annotation, Expression, RetentionPolicy, VALUE_MEMBER};

pub struct RepeatableAnnotationFolder<'a> {
    registry: &'a ClassRegistry,
    evaluator: &'a dyn MemberValueEvaluator,
}

struct FoldPlan {
    indices: Vec<usize>,
    container: Annotation,
}

impl<'a> RepeatableAnnotationFolder<'a> {
    pub fn new(registry: &'a ClassRegistry, evaluator: &'a dyn MemberValueEvaluator) -> Self {
        Self {
            registry,
            evaluator,
        }
    }

    /// 1 つの宣言に付いた注釈列を畳み込み、検出した問題を診断として返す。
    ///
    /// ソース保持の注釈と、注釈種別として解決できない注釈は対象外。
    /// `@Repeatable` を持たない種別の重複は報告のみで残し、
    /// 明示的なコンテナが既に付いている種別は報告して畳み込まない。
    /// 畳み込んだ種別の元の注釈は取り除かれ、合成したコンテナが末尾に追加される。
    pub fn fold(&self, annotations: &mut Vec<Annotation>) -> Vec<Diagnostic> {
        let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (index, annotation) in annotations.iter().enumerate() {
            // 注釈種別として解決できない名前は名前解決に任せる。
            if self.registry.annotation_kind(&annotation.kind).is_none()
                || self.effective_retention(annotation) == Some(RetentionPolicy::Source)
            {
                continue;
            }
            groups.entry(annotation.kind.as_str()).or_default().push(index);
        }

        let mut diagnostics = Vec::new();
        let mut plans = Vec::new();
        for (kind_name, indices) in groups.iter().filter(|(_, indices)| indices.len() > 1) {
            let repeated = &annotations[indices[1]];
            let container_kind = self
                .registry
                .annotation_kind(kind_name)
                .and_then(|kind| kind.repeatable_container.as_deref())
                .and_then(|container| self.registry.annotation_kind(container));
            let Some(container_kind) = container_kind else {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::IllegalDuplicateAnnotation,
                    format!("Cannot specify duplicate annotation on the same member : {kind_name}"),
                    Some(repeated.span.clone()),
                ));
                continue;
            };

            if let Some(explicit) = annotations
                .iter()
                .find(|annotation| annotation.kind == container_kind.name)
            {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ExplicitContainerConflict,
                    format!(
                        "Cannot specify duplicate annotation on the same member. Explicit {} found when creating implicit container for {kind_name}",
                        container_kind.name
                    ),
                    Some(explicit.span.clone()),
                ));
                continue;
            }

            let instances: Vec<&Annotation> = indices.iter().map(|&index| &annotations[index]).collect();
            let container = self.synthesize_container(container_kind, &instances);
            debug!(
                kind = %kind_name,
                container = %container.kind,
                count = instances.len(),
                retention = ?container.retention,
                "folded repeated annotations into implicit container"
            );
            plans.push(FoldPlan {
                indices: indices.clone(),
                container,
            });
        }

        if !plans.is_empty() {
            let removed: HashSet<usize> = plans
                .iter()
                .flat_map(|plan| plan.indices.iter().copied())
                .collect();
            let mut index = 0;
            annotations.retain(|_| {
                let keep = !removed.contains(&index);
                index += 1;
                keep
            });
            annotations.extend(plans.into_iter().map(|plan| plan.container));
        }
        diagnostics
    }

    fn synthesize_container(&self, container_kind: &AnnotationKind, instances: &[&Annotation]) -> Annotation {
        let span = instances
            .first()
            .map(|first| first.span.clone())
            .unwrap_or_default();

        // 個々の注釈の保持ポリシーを優先し、食い違う場合は最も強いものを採る。
        let retention = instances
            .iter()
            .filter_map(|instance| self.effective_retention(instance))
            .reduce(RetentionPolicy::strongest)
            .or_else(|| self.kind_retention(container_kind))
            .unwrap_or(RetentionPolicy::Class);

        let values = instances
            .iter()
            .map(|instance| Expression::annotation((*instance).clone()))
            .collect();

        let mut container = Annotation::new(container_kind.name.clone(), span)
            .with_member(VALUE_MEMBER, Expression::list(values))
            .with_retention(retention);
        container.targets = Some(container_kind.targets.clone());
        container
    }

    /// 注釈自身に記録された保持ポリシー、なければ種別が宣言する保持ポリシー。
    pub fn effective_retention(&self, annotation: &Annotation) -> Option<RetentionPolicy> {
        annotation.retention.or_else(|| {
            self.registry
                .annotation_kind(&annotation.kind)
                .and_then(|kind| self.kind_retention(kind))
        })
    }

    fn kind_retention(&self, kind: &AnnotationKind) -> Option<RetentionPolicy> {
        match &kind.retention {
            RetentionDecl::Policy(policy) => Some(*policy),
            RetentionDecl::Deferred(expression) => self
                .evaluator
                .evaluate(expression)
                .and_then(|value| RetentionPolicy::from_constant(&value)),
            RetentionDecl::Implicit => None,
        }
    }
}
