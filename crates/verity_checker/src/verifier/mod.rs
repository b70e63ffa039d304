//! 宣言レベルの検証パス。
//!
//! クラスの宣言木を深さ優先で辿り、注釈付きの各宣言について
//! 適用先の検査、繰り返し注釈の畳み込み、非推奨マーク、`@Override` の検証を行う。
//! 診断はすべて継続可能であり、パスは常に最後まで走査する。

mod declaration;


pub use declaration::Declaration;

use crate::annotations::{
    AnnotationMemberChecker, ConstantEvaluator, MemberValueEvaluator, RepeatableAnnotationFolder,
};
use crate::config::{ANNOTATIONS_MIN_RELEASE, VerifierConfig};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::overrides::{OverrideOutcome, OverrideVerifier};
use crate::registry::{ClassId, ClassRegistry};
use tracing::{debug, trace};
use verity_ast::{
    AnnotationTarget, ClassDecl, Expression, MethodDecl, Span, Statement, WellKnownAnnotation,
};

pub struct VerificationPass {
    config: VerifierConfig,
    evaluator: Box<dyn MemberValueEvaluator + Send + Sync>,
}

impl VerificationPass {
    pub fn new(config: VerifierConfig) -> Self {
        Self::with_evaluator(config, ConstantEvaluator::new())
    }

    pub fn with_evaluator(
        config: VerifierConfig,
        evaluator: impl MemberValueEvaluator + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            evaluator: Box::new(evaluator),
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// 1 つのクラスを検証し、収集した診断を返す。
    ///
    /// 畳み込みや非推奨マークによる宣言の変更はレジストリへ書き戻される。
    pub fn verify_class(&self, registry: &mut ClassRegistry, id: ClassId) -> Vec<Diagnostic> {
        let mut decl = registry.class(id).clone();
        let unit = registry.source_unit_of(id).map(str::to_string);

        let (diagnostics, annotated) = {
            let mut walker = Walker::new(self, registry, registry.class(id));
            walker.walk_class(&mut decl);
            (walker.diagnostics, walker.annotated)
        };
        decl.annotated |= annotated;

        debug!(
            class = %decl.name,
            diagnostics = diagnostics.len(),
            annotated = decl.annotated,
            "verified class declarations"
        );
        *registry.class_mut(id) = decl;

        match unit {
            Some(unit) => diagnostics
                .into_iter()
                .map(|diagnostic| diagnostic.in_unit(unit.clone()))
                .collect(),
            None => diagnostics,
        }
    }

    /// 登録順にすべての宣言済みクラスを検証する。
    pub fn verify_all(&self, registry: &mut ClassRegistry) -> Vec<Diagnostic> {
        let ids: Vec<ClassId> = registry.classes().collect();
        ids.into_iter()
            .flat_map(|id| self.verify_class(registry, id))
            .collect()
    }
}

struct Walker<'p> {
    config: &'p VerifierConfig,
    registry: &'p ClassRegistry,
    /// 登録時点の宣言。階層とメンバの探索に使う。
    declaring: &'p ClassDecl,
    folder: RepeatableAnnotationFolder<'p>,
    diagnostics: Vec<Diagnostic>,
    annotated: bool,
}

impl<'p> Walker<'p> {
    fn new(pass: &'p VerificationPass, registry: &'p ClassRegistry, declaring: &'p ClassDecl) -> Self {
        Self {
            config: &pass.config,
            registry,
            declaring,
            folder: RepeatableAnnotationFolder::new(registry, &*pass.evaluator),
            diagnostics: Vec::new(),
            annotated: false,
        }
    }

    fn walk_class(&mut self, class: &mut ClassDecl) {
        trace!(class = %class.name, "walking class declarations");
        self.visit_declaration(Declaration::Type(&mut *class));
        if let Some(package) = class.package.as_mut() {
            self.visit_declaration(Declaration::Package(&mut *package));
        }
        for field in &mut class.fields {
            self.visit_declaration(Declaration::Field(&mut *field));
            if let Some(initializer) = field.initializer.as_mut() {
                self.walk_expression(initializer);
            }
        }
        for constructor in &mut class.constructors {
            self.walk_method(constructor, true);
        }
        for method in &mut class.methods {
            self.walk_method(method, false);
        }
    }

    fn walk_method(&mut self, method: &mut MethodDecl, constructor: bool) {
        if constructor {
            self.visit_declaration(Declaration::Constructor(&mut *method));
        } else {
            self.visit_declaration(Declaration::Method(&mut *method));
        }
        for parameter in &mut method.parameters {
            self.visit_declaration(Declaration::Parameter(&mut *parameter));
            if let Some(default) = parameter.default_value.as_mut() {
                self.walk_expression(default);
            }
        }
        if !constructor
            && self.declaring.is_annotation_definition()
            && self.config.check_annotation_members
        {
            let checker = AnnotationMemberChecker::new(self.registry);
            self.diagnostics.extend(checker.check(self.declaring, method));
        }
        if let Some(body) = method.body.as_mut() {
            self.walk_statements(body);
        }
    }

    fn walk_statements(&mut self, statements: &mut [Statement]) {
        for statement in statements {
            match statement {
                Statement::Declaration(local) => {
                    self.visit_declaration(Declaration::LocalVariable(&mut *local));
                    if let Some(initializer) = local.initializer.as_mut() {
                        self.walk_expression(initializer);
                    }
                }
                Statement::Return { value, .. } => {
                    if let Some(value) = value.as_mut() {
                        self.walk_expression(value);
                    }
                }
                Statement::Expression { expr, .. } => self.walk_expression(expr),
                Statement::Block { statements, .. } => self.walk_statements(statements),
            }
        }
    }

    fn walk_expression(&mut self, expression: &mut Expression) {
        match expression {
            Expression::Closure { body, .. } => self.walk_statements(body),
            Expression::List { elements, .. } => {
                for element in elements {
                    self.walk_expression(element);
                }
            }
            _ => {}
        }
    }

    /// 注釈付き宣言 1 つ分の処理。すべての宣言種別がここを通る。
    fn visit_declaration(&mut self, mut declaration: Declaration<'_>) {
        if declaration.annotations().is_empty() {
            return;
        }
        self.annotated = true;

        if !self.config.annotations_supported() {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::AnnotationsUnsupported,
                format!(
                    "Annotations are not supported by target release {}; release {ANNOTATIONS_MIN_RELEASE} or newer is required.",
                    self.config.target_release
                ),
                Some(declaration.span().clone()),
            ));
            return;
        }

        let target = declaration.target();
        let registry = self.registry;
        let mut deprecated = false;
        let mut override_span: Option<Span> = None;

        for annotation in declaration.annotations_mut().iter_mut() {
            let Some(kind) = registry.annotation_kind(&annotation.kind) else {
                if registry.find_class(&annotation.kind).is_some() {
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::NotAnAnnotation,
                        format!("{} is not an annotation type", annotation.kind),
                        Some(annotation.span.clone()),
                    ));
                }
                continue;
            };

            if annotation.retention.is_none() {
                annotation.retention = self.folder.effective_retention(annotation);
            }
            if annotation.targets.is_none() {
                annotation.targets = Some(kind.targets.clone());
            }

            let exempt = kind.well_known == WellKnownAnnotation::Target
                && target == AnnotationTarget::AnnotationType;
            if self.config.check_targets && !exempt && !kind.targets.allows(target) {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::AnnotationTargetMismatch,
                    format!(
                        "Annotation @{} is not allowed on element {target}",
                        annotation.kind
                    ),
                    Some(annotation.span.clone()),
                ));
            }

            match kind.well_known {
                WellKnownAnnotation::Deprecated => deprecated = true,
                WellKnownAnnotation::Override => override_span = Some(annotation.span.clone()),
                _ => {}
            }
        }

        if self.config.fold_repeatable {
            let issues = self.folder.fold(declaration.annotations_mut());
            self.diagnostics.extend(issues);
        }
        if deprecated {
            declaration.mark_deprecated();
        }
        if let (Some(span), Declaration::Method(method)) = (override_span, &declaration) {
            self.verify_override(method, span);
        }
    }

    fn verify_override(&mut self, method: &MethodDecl, span: Span) {
        if !self.config.verify_overrides || method.generated_default_variant {
            return;
        }
        let outcome = OverrideVerifier::new(self.registry).verify(self.declaring, method);
        match outcome {
            OverrideOutcome::Confirmed { overridden, .. } => {
                trace!(method = %method.descriptor(), overridden = %overridden, "override confirmed");
            }
            OverrideOutcome::NotFound => {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MissingOverride,
                    format!(
                        "Method '{}' from class '{}' does not override method from its superclass or interfaces but is annotated with @Override.",
                        method.name, self.declaring.name
                    ),
                    Some(span),
                ));
            }
        }
    }
}
