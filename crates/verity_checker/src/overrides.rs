//! `@Override` の検証。
//!
//! 宣言クラスから上位クラスの連鎖を辿り、各段で直接・間接に実装するインターフェースを
//! 明示的なスタックで探索する。型引数の置換は段ごとに合成する。

use crate::generics::{
    MethodSignature, SubstitutionMap, build_substitution_map, erased_parameter_map,
    substitute_method,
};
use crate::registry::{ClassId, ClassRegistry};
use std::collections::HashSet;
use tracing::trace;
use verity_ast::{ClassDecl, MethodDecl, TypeRef};

/// 上書き探索の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideOutcome {
    Confirmed {
        /// 上書きされたメソッドを宣言する型。
        owner: ClassId,
        /// `owner` が宣言したままの、上書きされたメソッドの記述子。
        overridden: String,
    },
    NotFound,
}

impl OverrideOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, OverrideOutcome::Confirmed { .. })
    }
}

pub struct OverrideVerifier<'r> {
    registry: &'r ClassRegistry,
}

impl<'r> OverrideVerifier<'r> {
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self { registry }
    }

    /// `declaring` に宣言された `method` が継承メソッドを上書きしているか判定する。
    ///
    /// 既定値付きパラメータを持つメソッドは、右から既定値付きパラメータを落とした
    /// いずれかの版が一致すれば上書きとみなす。
    pub fn verify(&self, declaring: &ClassDecl, method: &MethodDecl) -> OverrideOutcome {
        let targets = signature_variants(declaring, method);
        let mut visited: HashSet<(ClassId, SubstitutionMap)> = HashSet::new();

        // 宣言クラス自身の段は識別子を持たず、自身のメソッドは探索しない。
        let mut level: Option<(Option<ClassId>, &ClassDecl, SubstitutionMap)> =
            Some((None, declaring, erased_parameter_map(declaring)));

        while let Some((id, decl, map)) = level.take() {
            if let Some(owner) = id {
                if let Some(outcome) = self.search_declared(owner, decl, &map, &targets) {
                    return outcome;
                }
            }

            if let Some(outcome) = self.search_interfaces(decl, &map, &targets, &mut visited) {
                return outcome;
            }

            let Some(superclass) = decl.superclass_or_object() else {
                break;
            };
            let Some((super_id, super_map)) = self.step(&superclass, &map) else {
                break;
            };
            if !visited.insert((super_id, super_map.clone())) {
                break;
            }
            trace!(method = %method.name, superclass = %superclass, "override search advances");
            level = Some((Some(super_id), self.registry.class(super_id), super_map));
        }

        trace!(method = %method.descriptor(), class = %declaring.name, "no overridden method found");
        OverrideOutcome::NotFound
    }

    fn search_interfaces(
        &self,
        decl: &ClassDecl,
        map: &SubstitutionMap,
        targets: &[MethodSignature],
        visited: &mut HashSet<(ClassId, SubstitutionMap)>,
    ) -> Option<OverrideOutcome> {
        let mut stack: Vec<(ClassId, SubstitutionMap)> = decl
            .interfaces
            .iter()
            .rev()
            .filter_map(|reference| self.step(reference, map))
            .collect();

        while let Some((id, interface_map)) = stack.pop() {
            if !visited.insert((id, interface_map.clone())) {
                continue;
            }
            let interface = self.registry.class(id);
            trace!(interface = %interface.name, "override search visits interface");
            if let Some(outcome) = self.search_declared(id, interface, &interface_map, targets) {
                return Some(outcome);
            }
            stack.extend(
                interface
                    .interfaces
                    .iter()
                    .rev()
                    .filter_map(|reference| self.step(reference, &interface_map)),
            );
        }
        None
    }

    /// `decl` が宣言するメソッドを宣言クラスの型で書き直して照合する。
    fn search_declared(
        &self,
        owner: ClassId,
        decl: &ClassDecl,
        map: &SubstitutionMap,
        targets: &[MethodSignature],
    ) -> Option<OverrideOutcome> {
        let name = &targets.first()?.name;
        decl.declared_methods(name).find_map(|candidate| {
            let signature = substitute_method(candidate, map);
            targets
                .iter()
                .any(|target| target.parameters_match(&signature))
                .then(|| OverrideOutcome::Confirmed {
                    owner,
                    overridden: candidate.descriptor(),
                })
        })
    }

    /// 上位型の参照を解決し、`outer` から次の段の置換マップを導く。
    fn step(&self, reference: &TypeRef, outer: &SubstitutionMap) -> Option<(ClassId, SubstitutionMap)> {
        let name = reference.class_name()?;
        let Some(id) = self.registry.find_class(name) else {
            trace!(class = name, "supertype is not resolved; stopping this branch");
            return None;
        };
        let map = build_substitution_map(reference, self.registry.class(id), outer);
        Some((id, map))
    }
}

/// 宣言どおりのシグネチャと、既定値付きパラメータを右から落とした各版。
fn signature_variants(declaring: &ClassDecl, method: &MethodDecl) -> Vec<MethodSignature> {
    let full = substitute_method(method, &erased_parameter_map(declaring));
    let defaulted: Vec<usize> = method
        .parameters
        .iter()
        .enumerate()
        .filter(|(_, parameter)| parameter.has_default_value())
        .map(|(index, _)| index)
        .collect();

    (0..=defaulted.len())
        .map(|dropped| {
            let removed = &defaulted[defaulted.len() - dropped..];
            MethodSignature {
                name: full.name.clone(),
                parameters: full
                    .parameters
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| !removed.contains(index))
                    .map(|(_, ty)| ty.clone())
                    .collect(),
                return_type: full.return_type.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_ast::{ClassKind, Expression, Parameter, TypeParameter};

    fn string() -> TypeRef {
        TypeRef::class("java.lang.String")
    }

    #[test]
    fn default_argument_variants_drop_from_the_right() {
        let declaring = ClassDecl::new("demo.Greeter", ClassKind::Class);
        let mut greeting = Parameter::new("greeting", string());
        greeting.default_value = Some(Expression::string("hi"));
        let mut times = Parameter::new("times", TypeRef::primitive("int"));
        times.default_value = Some(Expression::string("1"));
        let method = MethodDecl::new(
            "greet",
            vec![greeting, Parameter::new("name", string()), times],
            TypeRef::Void,
        );

        let arities: Vec<Vec<TypeRef>> = signature_variants(&declaring, &method)
            .into_iter()
            .map(|signature| signature.parameters)
            .collect();
        assert_eq!(
            arities,
            vec![
                vec![string(), string(), TypeRef::primitive("int")],
                vec![string(), string()],
                vec![string()],
            ]
        );
    }

    #[test]
    fn interface_maps_compose_through_superinterfaces() {
        let mut registry = ClassRegistry::with_jdk_defaults();

        let mut consumer = ClassDecl::new("demo.Consumer", ClassKind::Interface);
        consumer.type_parameters = vec![TypeParameter::new("A")];
        consumer.methods.push(MethodDecl::new(
            "accept",
            vec![Parameter::new("value", TypeRef::variable("A"))],
            TypeRef::Void,
        ));
        registry.add_declared_type(consumer, "Consumer.groovy");

        let mut sink = ClassDecl::new("demo.Sink", ClassKind::Interface);
        sink.type_parameters = vec![TypeParameter::new("B")];
        sink.interfaces = vec![TypeRef::parameterized(
            "demo.Consumer",
            vec![TypeRef::parameterized("java.util.List", vec![TypeRef::variable("B")])],
        )];
        registry.add_declared_type(sink, "Sink.groovy");

        let mut impl_class = ClassDecl::new("demo.StringSink", ClassKind::Class);
        impl_class.interfaces = vec![TypeRef::parameterized("demo.Sink", vec![string()])];
        let accept = MethodDecl::new(
            "accept",
            vec![Parameter::new(
                "value",
                TypeRef::parameterized("java.util.List", vec![string()]),
            )],
            TypeRef::Void,
        );
        let wrong = MethodDecl::new("accept", vec![Parameter::new("value", string())], TypeRef::Void);

        let verifier = OverrideVerifier::new(&registry);
        let outcome = verifier.verify(&impl_class, &accept);
        assert_eq!(
            outcome,
            OverrideOutcome::Confirmed {
                owner: registry.find_class("demo.Consumer").expect("registered"),
                overridden: "void accept(A)".to_string(),
            }
        );
        assert_eq!(verifier.verify(&impl_class, &wrong), OverrideOutcome::NotFound);
    }

    #[test]
    fn object_methods_are_inherited_implicitly() {
        let registry = ClassRegistry::with_jdk_defaults();
        let plain = ClassDecl::new("demo.Plain", ClassKind::Class);
        let to_string = MethodDecl::new("toString", vec![], string());
        let verifier = OverrideVerifier::new(&registry);
        assert!(verifier.verify(&plain, &to_string).is_confirmed());
    }

    #[test]
    fn unresolved_superclass_stops_the_search() {
        let registry = ClassRegistry::new();
        let mut orphan = ClassDecl::new("demo.Orphan", ClassKind::Class);
        orphan.superclass = Some(TypeRef::class("demo.Missing"));
        let method = MethodDecl::new("run", vec![], TypeRef::Void);
        assert_eq!(
            OverrideVerifier::new(&registry).verify(&orphan, &method),
            OverrideOutcome::NotFound
        );
    }
}
