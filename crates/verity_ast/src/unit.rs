use crate::{ClassDecl, Span};
use serde::{Deserialize, Serialize};

/// Name referenced by a source unit before its declaration has been seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSite {
    pub name: String,
    #[serde(default)]
    pub span: Span,
}

/// Parsed contents of one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleNode {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub references: Vec<ReferenceSite>,
}

/// One source file of a compilation run.
///
/// `module` is `None` when parsing failed and no tree could be built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub name: String,
    #[serde(default)]
    pub module: Option<ModuleNode>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, classes: Vec<ClassDecl>) -> Self {
        Self {
            name: name.into(),
            module: Some(ModuleNode {
                classes,
                references: Vec::new(),
            }),
        }
    }

    pub fn classes(&self) -> &[ClassDecl] {
        self.module
            .as_ref()
            .map(|module| module.classes.as_slice())
            .unwrap_or(&[])
    }
}

/// Everything handed to the verifier for one compilation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationInput {
    #[serde(default)]
    pub units: Vec<SourceUnit>,
    /// Precompiled classes visible on the classpath.
    #[serde(default)]
    pub external: Vec<ClassDecl>,
}
