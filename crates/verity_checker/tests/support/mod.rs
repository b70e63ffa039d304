#![allow(dead_code)]

use verity_ast::{
    Annotation, ClassDecl, ClassKind, Expression, MethodDecl, Parameter, REPEATABLE_ANNOTATION,
    RETENTION_ANNOTATION, Span, TARGET_ANNOTATION, TypeParameter, TypeRef, VALUE_MEMBER,
};

pub fn annotation_definition(name: &str, retention: Option<&str>, targets: &[&str]) -> ClassDecl {
    let mut decl = ClassDecl::new(name, ClassKind::Annotation);
    if let Some(retention) = retention {
        decl.annotations.push(
            Annotation::new(RETENTION_ANNOTATION, Span::dummy()).with_member(
                VALUE_MEMBER,
                Expression::enum_constant("java.lang.annotation.RetentionPolicy", retention),
            ),
        );
    }
    if !targets.is_empty() {
        let values = targets
            .iter()
            .map(|target| Expression::enum_constant("java.lang.annotation.ElementType", *target))
            .collect();
        decl.annotations.push(
            Annotation::new(TARGET_ANNOTATION, Span::dummy())
                .with_member(VALUE_MEMBER, Expression::list(values)),
        );
    }
    decl
}

pub fn repeatable(mut decl: ClassDecl, container: &str) -> ClassDecl {
    decl.annotations.push(
        Annotation::new(REPEATABLE_ANNOTATION, Span::dummy())
            .with_member(VALUE_MEMBER, Expression::class_literal(TypeRef::class(container))),
    );
    decl
}

pub fn annotation(kind: &str, line: usize) -> Annotation {
    Annotation::new(kind, Span::new(line, 1, line, 12))
}

pub fn tagged(kind: &str, line: usize, value: &str) -> Annotation {
    annotation(kind, line).with_member(VALUE_MEMBER, Expression::string(value))
}

pub fn class(name: &str) -> ClassDecl {
    ClassDecl::new(name, ClassKind::Class)
}

pub fn generic_class(name: &str, kind: ClassKind, parameters: &[&str]) -> ClassDecl {
    let mut decl = ClassDecl::new(name, kind);
    decl.type_parameters = parameters.iter().map(|name| TypeParameter::new(*name)).collect();
    decl
}

pub fn method(name: &str, parameters: Vec<TypeRef>) -> MethodDecl {
    let parameters = parameters
        .into_iter()
        .enumerate()
        .map(|(index, ty)| Parameter::new(format!("p{index}"), ty))
        .collect();
    MethodDecl::new(name, parameters, TypeRef::Void)
}

pub fn overriding(mut method: MethodDecl, line: usize) -> MethodDecl {
    method
        .annotations
        .push(annotation(verity_ast::OVERRIDE_ANNOTATION, line));
    method
}

pub fn string() -> TypeRef {
    TypeRef::class("java.lang.String")
}
