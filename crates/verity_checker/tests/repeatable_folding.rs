mod support;

use support::{annotation, annotation_definition, repeatable, tagged};
use verity_ast::{
    Annotation, AnnotationTarget, Expression, RETENTION_ANNOTATION, RetentionPolicy, Span,
    VALUE_MEMBER,
};
use verity_checker::{
    ClassRegistry, ConstantEvaluator, DiagnosticKind, RepeatableAnnotationFolder,
};

fn registry() -> ClassRegistry {
    let mut registry = ClassRegistry::with_jdk_defaults();
    let declarations = [
        repeatable(
            annotation_definition("demo.Tag", Some("RUNTIME"), &["TYPE", "METHOD"]),
            "demo.Tags",
        ),
        annotation_definition("demo.Tags", Some("RUNTIME"), &["TYPE", "METHOD"]),
        annotation_definition("demo.Plain", Some("RUNTIME"), &[]),
        annotation_definition("demo.Note", Some("SOURCE"), &[]),
        repeatable(annotation_definition("demo.Mark", None, &[]), "demo.Marks"),
        repeatable(annotation_definition("demo.Broken", Some("RUNTIME"), &[]), "demo.Missing"),
    ];
    for decl in declarations {
        registry.add_declared_type(decl, "Annotations.groovy");
    }

    let mut marks = annotation_definition("demo.Marks", None, &[]);
    marks.annotations.push(Annotation::new(RETENTION_ANNOTATION, Span::dummy()).with_member(
        VALUE_MEMBER,
        Expression::Constant {
            name: "Policies.KEEP".to_string(),
            span: Span::dummy(),
        },
    ));
    registry.add_declared_type(marks, "Annotations.groovy");
    registry
}

fn values(container: &Annotation) -> Vec<String> {
    container
        .member(VALUE_MEMBER)
        .map(Expression::elements)
        .unwrap_or_default()
        .iter()
        .filter_map(Expression::as_annotation)
        .map(|instance| {
            instance
                .member(VALUE_MEMBER)
                .map(Expression::text)
                .unwrap_or_default()
        })
        .collect()
}

#[test]
fn three_instances_fold_into_one_container_in_order() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![
        tagged("demo.Tag", 1, "a"),
        annotation("demo.Plain", 2),
        tagged("demo.Tag", 3, "b"),
        tagged("demo.Tag", 4, "c"),
    ];

    let diagnostics = folder.fold(&mut annotations);

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0].kind, "demo.Plain");
    let container = &annotations[1];
    assert_eq!(container.kind, "demo.Tags");
    assert_eq!(values(container), vec!["\"a\"", "\"b\"", "\"c\""]);
    assert_eq!(container.retention, Some(RetentionPolicy::Runtime));
    assert_eq!(container.span, Span::new(1, 1, 1, 12));
    assert!(
        container
            .targets
            .as_ref()
            .is_some_and(|targets| targets.allows(AnnotationTarget::Method))
    );

    let folded = annotations.clone();
    assert!(folder.fold(&mut annotations).is_empty());
    assert_eq!(annotations, folded);
}

#[test]
fn non_repeatable_duplicates_are_reported_and_left_in_place() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![annotation("demo.Plain", 1), annotation("demo.Plain", 2)];
    let original = annotations.clone();

    let diagnostics = folder.fold(&mut annotations);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), DiagnosticKind::IllegalDuplicateAnnotation);
    assert_eq!(
        diagnostics[0].message(),
        "Cannot specify duplicate annotation on the same member : demo.Plain"
    );
    assert_eq!(diagnostics[0].span(), Some(&Span::new(2, 1, 2, 12)));
    assert_eq!(annotations, original);
}

#[test]
fn container_that_does_not_resolve_is_an_illegal_duplicate() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![annotation("demo.Broken", 1), annotation("demo.Broken", 2)];

    let diagnostics = folder.fold(&mut annotations);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), DiagnosticKind::IllegalDuplicateAnnotation);
    assert_eq!(annotations.len(), 2);
}

#[test]
fn source_retained_duplicates_are_ignored() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![annotation("demo.Note", 1), annotation("demo.Note", 2)];

    assert!(folder.fold(&mut annotations).is_empty());
    assert_eq!(annotations.len(), 2);
}

#[test]
fn unresolved_kinds_are_left_to_name_resolution() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![
        annotation("com.unknown.Tag", 1),
        annotation("com.unknown.Tag", 2),
    ];
    let original = annotations.clone();

    assert!(folder.fold(&mut annotations).is_empty());
    assert_eq!(annotations, original);
}

#[test]
fn explicit_container_blocks_implicit_folding() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![
        annotation("demo.Tags", 1),
        tagged("demo.Tag", 2, "a"),
        tagged("demo.Tag", 3, "b"),
    ];
    let original = annotations.clone();

    let diagnostics = folder.fold(&mut annotations);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), DiagnosticKind::ExplicitContainerConflict);
    assert_eq!(
        diagnostics[0].message(),
        "Cannot specify duplicate annotation on the same member. Explicit demo.Tags found when creating implicit container for demo.Tag"
    );
    assert_eq!(diagnostics[0].span(), Some(&Span::new(1, 1, 1, 12)));
    assert_eq!(annotations, original);
}

#[test]
fn mixed_retention_keeps_the_strongest() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![
        tagged("demo.Tag", 1, "a").with_retention(RetentionPolicy::Runtime),
        tagged("demo.Tag", 2, "b").with_retention(RetentionPolicy::Class),
    ];

    assert!(folder.fold(&mut annotations).is_empty());
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].retention, Some(RetentionPolicy::Class));
}

#[test]
fn container_retention_falls_back_to_evaluated_policy() {
    let registry = registry();
    let evaluator = ConstantEvaluator::new().with_binding("Policies.KEEP", "RUNTIME");
    let folder = RepeatableAnnotationFolder::new(&registry, &evaluator);
    let mut annotations = vec![annotation("demo.Mark", 1), annotation("demo.Mark", 2)];

    assert!(folder.fold(&mut annotations).is_empty());
    assert_eq!(annotations[0].kind, "demo.Marks");
    assert_eq!(annotations[0].retention, Some(RetentionPolicy::Runtime));

    let unbound = ConstantEvaluator::new();
    let folder = RepeatableAnnotationFolder::new(&registry, &unbound);
    let mut annotations = vec![annotation("demo.Mark", 1), annotation("demo.Mark", 2)];
    assert!(folder.fold(&mut annotations).is_empty());
    assert_eq!(annotations[0].retention, Some(RetentionPolicy::Class));
}
