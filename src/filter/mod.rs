//! # Filter Input
//!
//! Condition model and request-parameter parsing shared by the search,
//! export and analyze endpoints.

mod condition;
mod parser;

pub use condition::{ConditionSet, FilterCondition, OperatorKind};
pub use parser::{parse_conditions, PageParams, DEFAULT_PER_PAGE};
