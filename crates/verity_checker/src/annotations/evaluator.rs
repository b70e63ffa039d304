use std::collections::HashMap;
use verity_ast::{Expression, Literal};

/// 列挙定数ではない注釈メンバ値から定数テキストを読み取る。
///
/// コンテナ種別が `@Retention` を `RetentionPolicy.X` ではなく
/// 定数参照で宣言している場合に使う。
pub trait MemberValueEvaluator {
    fn evaluate(&self, expression: &Expression) -> Option<String>;
}

/// 文字列リテラル、列挙定数、既知の名前付き定数を評価する。
#[derive(Debug, Clone, Default)]
pub struct ConstantEvaluator {
    bindings: HashMap<String, String>,
}

impl ConstantEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }
}

impl MemberValueEvaluator for ConstantEvaluator {
    fn evaluate(&self, expression: &Expression) -> Option<String> {
        match expression {
            Expression::Literal {
                value: Literal::String(text),
                ..
            } => Some(text.clone()),
            Expression::EnumConstant { constant, .. } => Some(constant.clone()),
            Expression::Constant { name, .. } => self.bindings.get(name).cloned(),
            _ => None,
        }
    }
}
