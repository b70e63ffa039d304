use crate::{Annotation, Expression, OBJECT_CLASS, Span, TypeParameter, TypeRef};
use serde::{Deserialize, Serialize};

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    /// `@interface` declaration.
    Annotation,
}

/// Class, interface, enum or annotation definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Fully-qualified name.
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    /// Explicit superclass; `None` means `java.lang.Object`.
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub constructors: Vec<MethodDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub package: Option<PackageDecl>,
    /// Fully-qualified name of the enclosing class for nested declarations.
    #[serde(default)]
    pub enclosing: Option<String>,
    /// Class synthesized from a script body rather than a `class` statement.
    #[serde(default)]
    pub script_body: bool,
    #[serde(default)]
    pub deprecated: bool,
    /// Set once any declaration of the class carries annotations.
    #[serde(default)]
    pub annotated: bool,
    #[serde(default)]
    pub span: Span,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn is_annotation_definition(&self) -> bool {
        self.kind == ClassKind::Annotation
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn package_name(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(package, _)| package)
    }

    /// Superclass reference, defaulting to `java.lang.Object` for every type but Object itself.
    pub fn superclass_or_object(&self) -> Option<TypeRef> {
        match &self.superclass {
            Some(superclass) => Some(superclass.clone()),
            None if self.name == OBJECT_CLASS => None,
            None => Some(TypeRef::object()),
        }
    }

    pub fn declared_methods<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDecl> + 'a {
        self.methods.iter().filter(move |method| method.name == name)
    }

    pub fn annotations_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations
            .iter()
            .filter(move |annotation| annotation.kind == kind)
    }
}

/// Package declaration with its `package-info` annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDecl {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub span: Span,
}

/// Field (member variable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub initializer: Option<Expression>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub span: Span,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
            initializer: None,
            is_static: false,
            deprecated: false,
            span: Span::dummy(),
        }
    }
}

/// Method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub default_value: Option<Expression>,
    #[serde(default)]
    pub span: Span,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
            default_value: None,
            span: Span::dummy(),
        }
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }
}

/// Method or constructor declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default = "void_type")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub exceptions: Vec<TypeRef>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Method body; `None` for abstract and interface methods.
    #[serde(default)]
    pub body: Option<Vec<Statement>>,
    #[serde(default)]
    pub is_static: bool,
    /// `static { ... }` block compiled as `<clinit>`.
    #[serde(default)]
    pub static_initializer: bool,
    /// Overload generated from a method with default-valued parameters.
    #[serde(default)]
    pub generated_default_variant: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub span: Span,
}

fn void_type() -> TypeRef {
    TypeRef::Void
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_parameters: Vec::new(),
            parameters,
            return_type,
            exceptions: Vec::new(),
            annotations: Vec::new(),
            body: None,
            is_static: false,
            static_initializer: false,
            generated_default_variant: false,
            deprecated: false,
            span: Span::dummy(),
        }
    }

    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.parameters.iter().map(|parameter| &parameter.ty)
    }

    pub fn has_default_arguments(&self) -> bool {
        self.parameters.iter().any(Parameter::has_default_value)
    }

    /// Value of the single `return` statement of an annotation member, i.e. its default.
    pub fn return_expression(&self) -> Option<&Expression> {
        self.body.as_deref()?.iter().find_map(|statement| match statement {
            Statement::Return { value, .. } => value.as_ref(),
            _ => None,
        })
    }

    /// `name:p1,p2,` using erased parameter types.
    pub fn descriptor_without_return(&self) -> String {
        let mut descriptor = String::with_capacity(self.name.len() + self.parameters.len() * 10);
        descriptor.push_str(&self.name);
        descriptor.push(':');
        for ty in self.parameter_types() {
            descriptor.push_str(&ty.erasure().to_string());
            descriptor.push(',');
        }
        descriptor
    }

    /// `ret name(p1, p2)` using erased types.
    pub fn descriptor(&self) -> String {
        let parameters = self
            .parameter_types()
            .map(|ty| ty.erasure().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}({})", self.return_type.erasure(), self.name, parameters)
    }

    /// Bean property name for `getX()`, `setX(v)` and `isX()` accessors.
    pub fn property_name(&self) -> Option<String> {
        let name = self.name.as_str();
        if name.len() <= 2 {
            return None;
        }
        if let Some(rest) = name.strip_prefix("get") {
            if !rest.is_empty() && self.parameters.is_empty() && self.return_type != TypeRef::Void {
                return Some(decapitalize(rest));
            }
        } else if let Some(rest) = name.strip_prefix("set") {
            if !rest.is_empty() && self.parameters.len() == 1 {
                return Some(decapitalize(rest));
            }
        } else if let Some(rest) = name.strip_prefix("is") {
            if self.parameters.is_empty() && self.return_type == TypeRef::primitive("boolean") {
                return Some(decapitalize(rest));
            }
        }
        None
    }
}

/// java.beans.Introspector#decapitalize: `URL` stays `URL`, `Name` becomes `name`.
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }
    let mut result = String::with_capacity(name.len());
    result.extend(first.to_lowercase());
    result.push_str(&name[first.len_utf8()..]);
    result
}

/// Local variable declaration inside a method body or closure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    #[serde(default)]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub initializer: Option<Expression>,
    #[serde(default)]
    pub span: Span,
}

/// Statements of a method body, reduced to what declaration verification walks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Declaration(LocalVariable),
    Return {
        #[serde(default)]
        value: Option<Expression>,
        #[serde(default)]
        span: Span,
    },
    Expression {
        expr: Expression,
        #[serde(default)]
        span: Span,
    },
    Block {
        statements: Vec<Statement>,
        #[serde(default)]
        span: Span,
    },
}

impl Statement {
    pub fn return_value(value: Expression) -> Self {
        Statement::Return {
            value: Some(value),
            span: Span::dummy(),
        }
    }
}
