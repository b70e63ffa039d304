//! 型パラメータの置換。
//!
//! 置換マップは階層の 1 段ごとに構築し、前の段で既に置換済みの型引数を使って合成する。
//! 全段を先に平坦化することはしない。

use std::collections::BTreeMap;
use verity_ast::{ClassDecl, MethodDecl, TypeRef};

/// 型パラメータ名から具体型への対応。1 段分のスコープを持つ。
pub type SubstitutionMap = BTreeMap<String, TypeRef>;

/// 比較に使うメソッドシグネチャ。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<TypeRef>,
    pub return_type: TypeRef,
}

impl MethodSignature {
    pub fn of(method: &MethodDecl) -> Self {
        Self {
            name: method.name.clone(),
            parameters: method.parameter_types().cloned().collect(),
            return_type: method.return_type.clone(),
        }
    }

    /// パラメータ列をイレイジャで比較する。戻り値型は比較しない。
    pub fn parameters_match(&self, other: &MethodSignature) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(left, right)| left.same_erasure(right))
    }
}

/// `map` に束縛された型変数をすべて置き換える。束縛のない型変数はそのまま残す。
pub fn substitute_type(ty: &TypeRef, map: &SubstitutionMap) -> TypeRef {
    if map.is_empty() {
        return ty.clone();
    }
    match ty {
        TypeRef::Variable(name) => map.get(name).cloned().unwrap_or_else(|| ty.clone()),
        TypeRef::Class {
            name,
            type_arguments,
        } => TypeRef::Class {
            name: name.clone(),
            type_arguments: type_arguments
                .iter()
                .map(|argument| substitute_type(argument, map))
                .collect(),
        },
        TypeRef::Array(element) => TypeRef::array_of(substitute_type(element, map)),
        TypeRef::Wildcard { kind, bound } => TypeRef::Wildcard {
            kind: *kind,
            bound: bound
                .as_ref()
                .map(|bound| Box::new(substitute_type(bound, map))),
        },
        TypeRef::Primitive(_) | TypeRef::Void => ty.clone(),
    }
}

/// 戻り値型と各パラメータ型を構造的に書き換えたシグネチャを返す。
pub fn substitute(signature: &MethodSignature, map: &SubstitutionMap) -> MethodSignature {
    MethodSignature {
        name: signature.name.clone(),
        parameters: signature
            .parameters
            .iter()
            .map(|parameter| substitute_type(parameter, map))
            .collect(),
        return_type: substitute_type(&signature.return_type, map),
    }
}

/// `map` を適用したメソッドのシグネチャ。
///
/// メソッド自身の型パラメータは外側の束縛を隠し、そのイレイジャへ置き換える。
pub fn substitute_method(method: &MethodDecl, map: &SubstitutionMap) -> MethodSignature {
    let signature = MethodSignature::of(method);
    if method.type_parameters.is_empty() {
        return substitute(&signature, map);
    }
    let mut scoped = map.clone();
    for parameter in &method.type_parameters {
        scoped.insert(parameter.name.clone(), parameter.erasure());
    }
    substitute(&signature, &scoped)
}

/// 各型パラメータをその上限のイレイジャへ対応づけるマップ（`T extends Number -> Number`）。
///
/// 宣言クラス自身の段と raw 参照の段で使う。
pub fn erased_parameter_map(decl: &ClassDecl) -> SubstitutionMap {
    decl.type_parameters
        .iter()
        .map(|parameter| (parameter.name.clone(), parameter.erasure()))
        .collect()
}

/// 上位型の参照から、その宣言の型パラメータ名と参照側の型引数を対にしたマップを作る。
///
/// 参照側の型引数は `outer`（一つ下の段のマップ）で先に置換してから対応づける。
/// 型引数のない raw 参照では各パラメータをそのイレイジャに対応づける。
pub fn build_substitution_map(
    reference: &TypeRef,
    decl: &ClassDecl,
    outer: &SubstitutionMap,
) -> SubstitutionMap {
    let arguments = reference.type_arguments();
    if arguments.is_empty() {
        return erased_parameter_map(decl);
    }
    decl.type_parameters
        .iter()
        .zip(arguments)
        .map(|(parameter, argument)| (parameter.name.clone(), substitute_type(argument, outer)))
        .collect()
}
