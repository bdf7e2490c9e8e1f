//! Explain output for compiled filter plans
//!
//! Deterministic, human-readable view of a [`FilterPlan`], printed by the
//! `explain` command and serializable to JSON.

use std::fmt;

use serde::Serialize;

use super::plan::{BoundValue, FilterPlan};

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Joins in the order they are applied
    pub joins: Vec<String>,
    /// Whether rows are de-duplicated
    pub requires_distinct: bool,
    /// Predicates with their values inlined
    pub predicates: Vec<String>,
    /// WHERE clause as executed, with placeholders
    pub sql: String,
    /// Values bound to the placeholders, in order
    pub bindings: Vec<BoundValue>,
}

impl ExplainPlan {
    pub fn from_plan(plan: &FilterPlan) -> Self {
        Self {
            joins: plan.joins().map(|j| j.as_str().to_string()).collect(),
            requires_distinct: plan.requires_distinct(),
            predicates: plan.predicates().iter().map(|p| p.to_string()).collect(),
            sql: plan.where_sql(),
            bindings: plan.bindings().into_iter().cloned().collect(),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.joins.is_empty() {
            writeln!(f, "Joins: none")?;
        } else {
            writeln!(f, "Joins: {}", self.joins.join(", "))?;
        }
        writeln!(f, "Distinct: {}", self.requires_distinct)?;
        writeln!(f, "Predicates:")?;
        for pred in &self.predicates {
            writeln!(f, "  - {}", pred)?;
        }
        writeln!(f, "SQL: {}", self.sql)?;

        Ok(())
    }
}
