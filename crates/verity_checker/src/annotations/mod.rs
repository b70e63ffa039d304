//! 注釈の解析: 繰り返し注釈の畳み込み、注釈定義メンバの検査、メンバ値の評価。

mod evaluator;
mod members;
mod repeatable;

pub use evaluator::{ConstantEvaluator, MemberValueEvaluator};
pub use members::AnnotationMemberChecker;
pub use repeatable::RepeatableAnnotationFolder;
