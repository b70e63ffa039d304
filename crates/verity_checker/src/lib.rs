// verity_checker - Class registry and declaration-level verification
//! 複数ソースにまたがる型レジストリと、注釈・`@Override` の検証パス。

pub mod annotations;
pub mod config;
pub mod diagnostics;
pub mod generics;
pub mod overrides;
pub mod registry;
pub mod verifier;

pub use annotations::{
    AnnotationMemberChecker, ConstantEvaluator, MemberValueEvaluator, RepeatableAnnotationFolder,
};
pub use config::{ConfigError, LoggingConfig, VerifierConfig, VerityConfig};
pub use diagnostics::{Diagnostic, DiagnosticDescriptor, DiagnosticKind, DiagnosticSeverity};
pub use generics::{MethodSignature, SubstitutionMap};
pub use overrides::{OverrideOutcome, OverrideVerifier};
pub use registry::{
    AnnotationKind, ClassEntry, ClassId, ClassOrigin, ClassRegistry, RedirectEvent, RegistryError,
    RetentionDecl, SourceLocation,
};
pub use verifier::{Declaration, VerificationPass};

use tracing::debug;
use verity_ast::CompilationInput;

/// 1 回の検証実行の結果。
#[derive(Debug)]
pub struct VerificationReport {
    pub registry: ClassRegistry,
    /// レジストリの診断が先、続いて検証パスの診断がクラスの登録順に並ぶ。
    pub diagnostics: Vec<Diagnostic>,
}

impl VerificationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity() == DiagnosticSeverity::Error)
    }

    /// 参照されたまま宣言されなかった名前。
    pub fn unresolved_names(&self) -> Vec<&str> {
        self.registry.pending_names().collect()
    }
}

/// 入力全体を新しいレジストリへ登録し、宣言済みの全クラスを検証する。
pub fn verify_compilation(input: CompilationInput, config: VerifierConfig) -> VerificationReport {
    let mut registry = ClassRegistry::with_jdk_defaults();
    for external in input.external {
        registry.register_external(external);
    }
    for unit in input.units {
        registry.add_source_unit(unit);
    }

    let mut diagnostics = registry.take_diagnostics();
    let pass = VerificationPass::new(config);
    diagnostics.extend(pass.verify_all(&mut registry));
    debug!(
        classes = registry.classes().count(),
        diagnostics = diagnostics.len(),
        "verification finished"
    );

    VerificationReport {
        registry,
        diagnostics,
    }
}
