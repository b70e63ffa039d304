use verity_ast::{
    Annotation, AnnotationTarget, ClassDecl, FieldDecl, LocalVariable, MethodDecl, PackageDecl,
    Parameter, Span,
};

/// 注釈を持ちうる宣言の直和型。要素種別と注釈列へ一様にアクセスする。
#[derive(Debug)]
pub enum Declaration<'a> {
    Type(&'a mut ClassDecl),
    Package(&'a mut PackageDecl),
    Field(&'a mut FieldDecl),
    Method(&'a mut MethodDecl),
    Constructor(&'a mut MethodDecl),
    Parameter(&'a mut Parameter),
    LocalVariable(&'a mut LocalVariable),
}

impl Declaration<'_> {
    pub fn target(&self) -> AnnotationTarget {
        match self {
            Declaration::Type(class) if class.is_annotation_definition() => {
                AnnotationTarget::AnnotationType
            }
            Declaration::Type(_) => AnnotationTarget::Type,
            Declaration::Package(_) => AnnotationTarget::Package,
            Declaration::Field(_) => AnnotationTarget::Field,
            Declaration::Method(_) => AnnotationTarget::Method,
            Declaration::Constructor(_) => AnnotationTarget::Constructor,
            Declaration::Parameter(_) => AnnotationTarget::Parameter,
            Declaration::LocalVariable(_) => AnnotationTarget::LocalVariable,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Type(class) => &class.name,
            Declaration::Package(package) => &package.name,
            Declaration::Field(field) => &field.name,
            Declaration::Method(method) | Declaration::Constructor(method) => &method.name,
            Declaration::Parameter(parameter) => &parameter.name,
            Declaration::LocalVariable(local) => &local.name,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Declaration::Type(class) => &class.span,
            Declaration::Package(package) => &package.span,
            Declaration::Field(field) => &field.span,
            Declaration::Method(method) | Declaration::Constructor(method) => &method.span,
            Declaration::Parameter(parameter) => &parameter.span,
            Declaration::LocalVariable(local) => &local.span,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Declaration::Type(class) => &class.annotations,
            Declaration::Package(package) => &package.annotations,
            Declaration::Field(field) => &field.annotations,
            Declaration::Method(method) | Declaration::Constructor(method) => &method.annotations,
            Declaration::Parameter(parameter) => &parameter.annotations,
            Declaration::LocalVariable(local) => &local.annotations,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        match self {
            Declaration::Type(class) => &mut class.annotations,
            Declaration::Package(package) => &mut package.annotations,
            Declaration::Field(field) => &mut field.annotations,
            Declaration::Method(method) | Declaration::Constructor(method) => {
                &mut method.annotations
            }
            Declaration::Parameter(parameter) => &mut parameter.annotations,
            Declaration::LocalVariable(local) => &mut local.annotations,
        }
    }

    /// パッケージ、パラメータ、ローカル変数は非推奨フラグを持たない。
    pub fn mark_deprecated(&mut self) {
        match self {
            Declaration::Type(class) => class.deprecated = true,
            Declaration::Field(field) => field.deprecated = true,
            Declaration::Method(method) | Declaration::Constructor(method) => {
                method.deprecated = true
            }
            Declaration::Package(_) | Declaration::Parameter(_) | Declaration::LocalVariable(_) => {}
        }
    }
}
