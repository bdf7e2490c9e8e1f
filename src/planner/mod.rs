//! Query Plan Compiler subsystem
//!
//! Compiles request filters into a backend-agnostic [`FilterPlan`].
//!
//! # Design Principles
//!
//! - Deterministic: same conditions and keyword produce the same plan
//! - Lenient: malformed conditions are dropped, never rejected
//! - Parameterized: identifiers come from the catalog schema, user values
//!   are carried as bound values only
//! - Scoped: every plan carries the `is_marine = TRUE` base predicate

mod compiler;
mod explain;
mod plan;

pub use compiler::{compile, PlanCompiler};
pub use explain::ExplainPlan;
pub use plan::{
    BoundValue, ColumnExpr, ColumnTransform, Comparison, CompiledPredicate, FilterPlan,
    SqlOperator,
};
