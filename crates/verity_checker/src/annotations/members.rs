//! 注釈定義（`@interface`）のメンバ宣言の検査。

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::registry::ClassRegistry;
use std::collections::HashSet;
use verity_ast::{ClassDecl, ClassKind, Expression, MethodDecl, TypeRef};

const STRING_CLASS: &str = "java.lang.String";
const CLASS_CLASS: &str = "java.lang.Class";

pub struct AnnotationMemberChecker<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> AnnotationMemberChecker<'a> {
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    /// 各違反は独立した診断になる。静的初期化子は対象外。
    pub fn check(&self, definition: &ClassDecl, member: &MethodDecl) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if member.static_initializer {
            return diagnostics;
        }

        if !member.parameters.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::AnnotationMemberParameters,
                "Annotation members may not have parameters.",
                Some(member.span.clone()),
            ));
        }
        if !member.exceptions.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::AnnotationMemberThrows,
                "Annotation members may not have a throws clause.",
                Some(member.span.clone()),
            ));
        }
        if !self.is_valid_member_type(&member.return_type) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::InvalidAnnotationMemberType,
                format!(
                    "Invalid type '{}' for annotation member '{}' of annotation {}",
                    member.return_type, member.name, definition.name
                ),
                Some(member.span.clone()),
            ));
        }

        if let Some(default) = member.return_expression() {
            let mut visited = HashSet::new();
            if let Some(culprit) = self.find_circular_reference(&definition.name, default, &mut visited) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::CircularAnnotationReference,
                    format!("Circular reference discovered in {culprit}"),
                    Some(default.span().clone()),
                ));
            }
        }
        diagnostics
    }

    /// プリミティブ、String、Class、列挙、注釈、またはそれらの 1 次元配列のみ許す。
    /// 未解決のクラス名は名前解決に任せる。
    fn is_valid_member_type(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Array(element) => !element.is_array() && self.is_valid_member_type(element),
            TypeRef::Primitive(_) => true,
            TypeRef::Class { name, .. } => {
                if name == STRING_CLASS || name == CLASS_CLASS {
                    return true;
                }
                match self.registry.find_class(name) {
                    Some(id) => matches!(
                        self.registry.class(id).kind,
                        ClassKind::Enum | ClassKind::Annotation
                    ),
                    None => true,
                }
            }
            TypeRef::Void | TypeRef::Variable(_) | TypeRef::Wildcard { .. } => false,
        }
    }

    /// 既定値の注釈が、メンバ型を通じて `search` 自身を参照していないか辿る。
    fn find_circular_reference(
        &self,
        search: &str,
        value: &Expression,
        visited: &mut HashSet<String>,
    ) -> Option<String> {
        for element in value.elements() {
            let Some(annotation) = element.as_annotation() else {
                continue;
            };
            if !visited.insert(annotation.kind.clone()) {
                continue;
            }
            let Some(id) = self.registry.find_class(&annotation.kind) else {
                continue;
            };
            let kind = self.registry.class(id);
            for member in &kind.methods {
                if member.return_type.element_type().class_name() == Some(search) {
                    return Some(kind.name.clone());
                }
                if let Some(nested) = member.return_expression() {
                    if let Some(culprit) = self.find_circular_reference(search, nested, visited) {
                        return Some(culprit);
                    }
                }
            }
        }
        None
    }
}
