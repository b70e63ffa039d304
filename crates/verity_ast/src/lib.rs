// verity_ast - Declaration tree consumed by the verity verifier
//! Declaration-level AST shared by the class registry and the verification pass.
//!
//! The parser front end produces these nodes; verification only reads names,
//! annotations, type references and member signatures, and writes back the
//! results of annotation folding and deprecation marking.

pub mod annotation;
pub mod declaration;
pub mod expression;
pub mod types;
pub mod unit;

pub use annotation::*;
pub use declaration::*;
pub use expression::*;
pub use types::*;
pub use unit::*;
