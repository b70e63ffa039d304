//! コンパイル実行ごとの型レジストリ。
//!
//! 宣言済みの型、前方参照のためのプレースホルダ、コンパイラが生成したネスト型、
//! クラスパス由来の外部型をアリーナに格納し、完全修飾名から `ClassId` を引く。
//! レジストリは追記専用であり、プレースホルダの解決（リダイレクト）以外で
//! エントリが書き換えられることはない。

mod annotation_kind;
mod jdk;


pub use annotation_kind::{AnnotationKind, RetentionDecl};
pub use jdk::jdk_classes;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace, warn};
use verity_ast::{ClassDecl, ClassKind, SourceUnit, Span};

/// アリーナ上の型エントリを指す安定した識別子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u32);

impl ClassId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 参照元のソースユニットと位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub unit: String,
    pub span: Span,
}

impl SourceLocation {
    pub fn new(unit: impl Into<String>, span: Span) -> Self {
        Self {
            unit: unit.into(),
            span,
        }
    }
}

/// エントリがレジストリに入った経路。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassOrigin {
    /// ソースユニット内の宣言。
    Declared { unit: String },
    /// 宣言前に参照された名前のプレースホルダ。
    Pending { location: SourceLocation },
    /// 外側のネスト型解決を待つプレースホルダ。
    OuterNested { enclosing: ClassId },
    /// クロージャなどコンパイラが合成したネスト型。
    Generated,
    /// クラスパス上のコンパイル済み型。
    External,
}

/// リダイレクト時にコールバックへ渡される情報。
pub struct RedirectEvent<'r> {
    pub placeholder: ClassId,
    pub target: ClassId,
    pub registry: &'r ClassRegistry,
}

type RedirectCallback = Box<dyn FnOnce(RedirectEvent<'_>) + Send>;

struct RedirectListener(RedirectCallback);

impl fmt::Debug for RedirectListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RedirectListener(..)")
    }
}

/// アリーナ上の 1 エントリ。
#[derive(Debug)]
pub struct ClassEntry {
    decl: ClassDecl,
    origin: ClassOrigin,
    placeholder: bool,
    redirect: Option<ClassId>,
    listeners: Vec<RedirectListener>,
    annotation_kind: Option<AnnotationKind>,
}

impl ClassEntry {
    pub fn decl(&self) -> &ClassDecl {
        &self.decl
    }

    pub fn origin(&self) -> &ClassOrigin {
        &self.origin
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn redirect_target(&self) -> Option<ClassId> {
        self.redirect
    }

    pub fn annotation_kind(&self) -> Option<&AnnotationKind> {
        self.annotation_kind.as_ref()
    }
}

/// 呼び出し側の契約違反。診断ではなくエラーとして返す。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown class id {0}")]
    UnknownClass(ClassId),
    #[error("class `{name}` is not a placeholder")]
    NotAPlaceholder { name: String },
    #[error("placeholder `{name}` has already been redirected")]
    AlreadyRedirected { name: String },
    #[error("placeholder `{name}` cannot be redirected onto itself")]
    SelfRedirect { name: String },
}

/// 1 回のコンパイル実行で共有される型レジストリ。
///
/// 実行ごとに新しいインスタンスを使うこと。複数の実行でレジストリを共有してはならない。
#[derive(Debug, Default)]
pub struct ClassRegistry {
    entries: Vec<ClassEntry>,
    known: IndexMap<String, ClassId>,
    pending: IndexMap<String, ClassId>,
    pending_sources: IndexMap<String, SourceLocation>,
    generated_nested: IndexMap<String, ClassId>,
    to_resolve: IndexMap<String, ClassId>,
    external: IndexMap<String, ClassId>,
    units: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `java.lang.Object` と標準メタ注釈を外部型として登録したレジストリ。
    pub fn with_jdk_defaults() -> Self {
        let mut registry = Self::new();
        for decl in jdk_classes() {
            registry.register_external(decl.clone());
        }
        registry
    }

    fn push_entry(&mut self, decl: ClassDecl, origin: ClassOrigin, placeholder: bool) -> ClassId {
        let id = ClassId::from_index(self.entries.len());
        let annotation_kind = (!placeholder && decl.is_annotation_definition())
            .then(|| AnnotationKind::from_declaration(&decl));
        self.entries.push(ClassEntry {
            decl,
            origin,
            placeholder,
            redirect: None,
            listeners: Vec::new(),
            annotation_kind,
        });
        id
    }

    /// ソースユニットの参照と宣言をまとめて登録する。
    ///
    /// 構文木を構築できなかったユニットは名前だけ記録して読み飛ばす。
    pub fn add_source_unit(&mut self, unit: SourceUnit) -> Vec<ClassId> {
        self.units.push(unit.name.clone());
        let Some(module) = unit.module else {
            debug!(unit = %unit.name, "source unit has no syntax tree; skipping");
            return Vec::new();
        };

        for reference in module.references {
            self.add_pending_reference(
                reference.name,
                SourceLocation::new(unit.name.clone(), reference.span),
            );
        }

        module
            .classes
            .into_iter()
            .map(|decl| self.add_declared_type(decl, &unit.name))
            .collect()
    }

    /// 完全に宣言された型を登録する。
    ///
    /// 同名の型が既に登録済みなら重複定義の診断を記録し、以後の参照は新しい型へ向く。
    /// 古い型は別エントリとして残り、統合はされない。同名の前方参照が保留中なら、
    /// そのプレースホルダを新しい型へリダイレクトして保留集合から取り除く。
    pub fn add_declared_type(&mut self, decl: ClassDecl, unit: &str) -> ClassId {
        let name = decl.name.clone();
        let id = self.push_entry(
            decl,
            ClassOrigin::Declared {
                unit: unit.to_string(),
            },
            false,
        );

        if let Some(&stored) = self.known.get(&name) {
            if stored != id {
                let diagnostic = self.duplicate_diagnostic(id, stored);
                warn!(class = %name, unit, "duplicate class definition");
                self.diagnostics.push(diagnostic);
            }
        }
        self.known.insert(name.clone(), id);
        debug!(class = %name, unit, id = %id, "registered class declaration");

        if let Some(placeholder) = self.pending.get(&name).copied() {
            if let Err(error) = self.redirect(placeholder, id) {
                warn!(class = %name, %error, "pending reference could not be redirected");
            }
        }
        id
    }

    fn duplicate_diagnostic(&self, added: ClassId, stored: ClassId) -> Diagnostic {
        let added_entry = &self.entries[added.index()];
        let stored_entry = &self.entries[stored.index()];
        let name = &added_entry.decl.name;
        let added_unit = self.source_unit_of(added).unwrap_or("<unknown>");
        let stored_unit = self.source_unit_of(stored).unwrap_or("<unknown>");

        let mut message = format!("Invalid duplicate class definition of class {name} : ");
        if added_unit == stored_unit {
            message.push_str(&format!(
                "The source {added_unit} contains at least two definitions of the class {name}."
            ));
            if added_entry.decl.script_body || stored_entry.decl.script_body {
                message.push_str(
                    " One of the classes is an explicit generated class using the class statement, \
                     the other is a class generated from the script body based on the file name. \
                     Solutions are to change the file name or to change the class name.",
                );
            }
        } else {
            message.push_str(&format!(
                "The sources {added_unit} and {stored_unit} each contain a class with the name {name}."
            ));
        }

        Diagnostic::new(
            DiagnosticKind::DuplicateClass,
            message,
            Some(added_entry.decl.span.clone()),
        )
        .in_unit(added_unit)
    }

    /// 宣言前に参照された名前を保留集合へ登録し、そのプレースホルダを返す。
    ///
    /// 既に宣言済みの名前なら宣言済みの型を、保留中なら既存のプレースホルダを返す。
    pub fn add_pending_reference(
        &mut self,
        name: impl Into<String>,
        location: SourceLocation,
    ) -> ClassId {
        let name = name.into();
        if let Some(&id) = self.known.get(&name) {
            trace!(class = %name, "reference to an already declared class");
            return id;
        }
        if let Some(&id) = self.pending.get(&name) {
            return id;
        }

        let id = self.push_entry(
            ClassDecl::new(name.clone(), ClassKind::Class),
            ClassOrigin::Pending {
                location: location.clone(),
            },
            true,
        );
        debug!(class = %name, unit = %location.unit, "registered pending reference");
        self.pending.insert(name.clone(), id);
        self.pending_sources.entry(name).or_insert(location);
        id
    }

    /// 宣言済み集合、保留集合の順に名前を引く。
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.known
            .get(name)
            .or_else(|| self.pending.get(name))
            .copied()
    }

    /// 解決済みの型を引く。プレースホルダはリダイレクト先を辿り、未解決なら外部型を探す。
    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        match self.lookup(name).map(|id| self.resolve(id)) {
            Some(id) if !self.entries[id.index()].placeholder => Some(id),
            _ => self.external.get(name).copied(),
        }
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.find_class(name).is_some()
    }

    /// リダイレクトの連鎖を辿った先の識別子。
    pub fn resolve(&self, id: ClassId) -> ClassId {
        let mut current = id;
        while let Some(next) = self.entries[current.index()].redirect {
            current = next;
        }
        current
    }

    pub fn has_unresolved_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.pending.keys().map(String::as_str)
    }

    /// 前方参照を最初に記録したソースユニット。解決後も保持される。
    pub fn script_source_location(&self, name: &str) -> Option<&SourceLocation> {
        self.pending_sources.get(name)
    }

    /// コンパイラが合成したネスト型を利用者の型とは別の名前空間へ登録する。
    pub fn register_generated_nested_type(&mut self, decl: ClassDecl) -> ClassId {
        let name = decl.name.clone();
        let id = self.push_entry(decl, ClassOrigin::Generated, false);
        if let Some(previous) = self.generated_nested.insert(name.clone(), id) {
            trace!(class = %name, previous = %previous, "generated nested type replaced");
        }
        id
    }

    pub fn lookup_generated_nested_type(&self, name: &str) -> Option<ClassId> {
        self.generated_nested.get(name).copied()
    }

    pub fn generated_nested_types(&self) -> impl Iterator<Item = (&str, ClassId)> + '_ {
        self.generated_nested
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
    }

    /// クラスパス上のコンパイル済み型を登録する。ソース上の宣言が常に優先される。
    pub fn register_external(&mut self, decl: ClassDecl) -> ClassId {
        let name = decl.name.clone();
        let id = self.push_entry(decl, ClassOrigin::External, false);
        self.external.insert(name, id);
        id
    }

    /// 外側の型が解決されるのを待つネスト型のプレースホルダを作成する。
    pub fn add_outer_nested_placeholder(
        &mut self,
        enclosing: ClassId,
        unresolved_name: impl Into<String>,
    ) -> Result<ClassId, RegistryError> {
        let enclosing_name = self.entry(enclosing)?.decl.name.clone();
        let name = unresolved_name.into();
        let mut decl = ClassDecl::new(name.clone(), ClassKind::Class);
        decl.enclosing = Some(enclosing_name);
        let id = self.push_entry(decl, ClassOrigin::OuterNested { enclosing }, true);
        self.to_resolve.insert(name, id);
        Ok(id)
    }

    pub fn classes_to_resolve(&self) -> impl Iterator<Item = (&str, ClassId)> + '_ {
        self.to_resolve.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// プレースホルダのリダイレクト時に呼ばれるコールバックを登録する。
    pub fn on_redirect<F>(&mut self, placeholder: ClassId, callback: F) -> Result<(), RegistryError>
    where
        F: FnOnce(RedirectEvent<'_>) + Send + 'static,
    {
        let entry = self.entry_mut(placeholder)?;
        if !entry.placeholder {
            return Err(RegistryError::NotAPlaceholder {
                name: entry.decl.name.clone(),
            });
        }
        if entry.redirect.is_some() {
            return Err(RegistryError::AlreadyRedirected {
                name: entry.decl.name.clone(),
            });
        }
        entry.listeners.push(RedirectListener(Box::new(callback)));
        Ok(())
    }

    /// プレースホルダを実体へ一度だけリダイレクトする。
    ///
    /// 登録済みコールバックは登録順に一度ずつ、リダイレクト先が設定される前に呼ばれる。
    /// その後プレースホルダは保留集合から取り除かれる。
    pub fn redirect(&mut self, placeholder: ClassId, target: ClassId) -> Result<(), RegistryError> {
        self.entry(target)?;
        let entry = self.entry(placeholder)?;
        let name = entry.decl.name.clone();
        if !entry.placeholder {
            return Err(RegistryError::NotAPlaceholder { name });
        }
        if entry.redirect.is_some() {
            return Err(RegistryError::AlreadyRedirected { name });
        }
        if self.resolve(target) == placeholder {
            return Err(RegistryError::SelfRedirect { name });
        }

        let listeners = std::mem::take(&mut self.entries[placeholder.index()].listeners);
        trace!(class = %name, callbacks = listeners.len(), "firing redirect callbacks");
        for RedirectListener(callback) in listeners {
            callback(RedirectEvent {
                placeholder,
                target,
                registry: &*self,
            });
        }

        self.entries[placeholder.index()].redirect = Some(target);
        if self.pending.get(&name) == Some(&placeholder) {
            self.pending.shift_remove(&name);
        }
        if self.to_resolve.get(&name) == Some(&placeholder) {
            self.to_resolve.shift_remove(&name);
        }
        debug!(class = %name, placeholder = %placeholder, target = %target, "placeholder redirected");
        Ok(())
    }

    pub fn entry(&self, id: ClassId) -> Result<&ClassEntry, RegistryError> {
        self.entries
            .get(id.index())
            .ok_or(RegistryError::UnknownClass(id))
    }

    fn entry_mut(&mut self, id: ClassId) -> Result<&mut ClassEntry, RegistryError> {
        self.entries
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownClass(id))
    }

    /// 識別子の宣言を返す。識別子はこのレジストリが発行したものに限る。
    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.entries[id.index()].decl
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDecl {
        &mut self.entries[id.index()].decl
    }

    /// 注釈種別のメタデータ。未解決の名前や注釈定義でない型には `None` を返す。
    pub fn annotation_kind(&self, name: &str) -> Option<&AnnotationKind> {
        let id = self.find_class(name)?;
        self.entries[id.index()].annotation_kind.as_ref()
    }

    /// ソース上で宣言された型を登録順に列挙する（重複定義で置き換えられた型も含む）。
    pub fn classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| matches!(entry.origin, ClassOrigin::Declared { .. }))
            .map(|(index, _)| ClassId::from_index(index))
    }

    pub fn source_unit_of(&self, id: ClassId) -> Option<&str> {
        match &self.entries.get(id.index())?.origin {
            ClassOrigin::Declared { unit } => Some(unit),
            ClassOrigin::Pending { location } => Some(&location.unit),
            ClassOrigin::OuterNested { enclosing } => self.source_unit_of(*enclosing),
            ClassOrigin::Generated | ClassOrigin::External => None,
        }
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
