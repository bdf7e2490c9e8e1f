//! Filter plan structures
//!
//! A [`FilterPlan`] is the compiled, storage-agnostic form of one request's
//! filters: which joins to add, which predicates to apply and whether rows
//! must be de-duplicated. Column expressions only ever reference static
//! schema identifiers; user input travels exclusively in [`BoundValue`]s.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::catalog::JoinKind;

/// Comparison operator emitted into SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
}

impl SqlOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlOperator::Eq => "=",
            SqlOperator::Ne => "!=",
            SqlOperator::Lt => "<",
            SqlOperator::Lte => "<=",
            SqlOperator::Gt => ">",
            SqlOperator::Gte => ">=",
            SqlOperator::Like => "LIKE",
        }
    }
}

/// Transformation applied to a column before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTransform {
    /// Compared as stored
    Plain,
    /// `LOWER(col)` for case-insensitive text comparison
    Lower,
    /// `CAST(col AS REAL)`
    CastReal,
    /// `CAST(col AS INTEGER)`
    CastInteger,
}

/// A schema column with its comparison transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnExpr {
    pub table: &'static str,
    pub column: &'static str,
    pub transform: ColumnTransform,
}

impl ColumnExpr {
    pub fn new(table: &'static str, column: &'static str, transform: ColumnTransform) -> Self {
        Self {
            table,
            column,
            transform,
        }
    }

    /// SQL text of the expression
    pub fn render(&self) -> String {
        match self.transform {
            ColumnTransform::Plain => format!("{}.{}", self.table, self.column),
            ColumnTransform::Lower => format!("LOWER({}.{})", self.table, self.column),
            ColumnTransform::CastReal => format!("CAST({}.{} AS REAL)", self.table, self.column),
            ColumnTransform::CastInteger => {
                format!("CAST({}.{} AS INTEGER)", self.table, self.column)
            }
        }
    }
}

/// Value bound as a query parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Integer(v) => write!(f, "{}", v),
            BoundValue::Real(v) => write!(f, "{}", v),
            BoundValue::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
            BoundValue::Boolean(true) => f.write_str("TRUE"),
            BoundValue::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

/// `column <op> ?`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: ColumnExpr,
    pub operator: SqlOperator,
    pub value: BoundValue,
}

impl Comparison {
    pub fn new(column: ColumnExpr, operator: SqlOperator, value: BoundValue) -> Self {
        Self {
            column,
            operator,
            value,
        }
    }

    /// SQL with a `?` placeholder for the value
    pub fn render(&self) -> String {
        format!("{} {} ?", self.column.render(), self.operator.as_sql())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.column.render(),
            self.operator.as_sql(),
            self.value
        )
    }
}

/// One conjunct of the WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledPredicate {
    Compare(Comparison),
    /// Parenthesised OR over comparisons
    AnyOf(Vec<Comparison>),
}

impl CompiledPredicate {
    /// Comparisons in binding order
    pub fn comparisons(&self) -> &[Comparison] {
        match self {
            CompiledPredicate::Compare(c) => std::slice::from_ref(c),
            CompiledPredicate::AnyOf(cs) => cs,
        }
    }

    /// SQL with `?` placeholders
    pub fn render(&self) -> String {
        match self {
            CompiledPredicate::Compare(c) => c.render(),
            CompiledPredicate::AnyOf(cs) => format!(
                "({})",
                cs.iter().map(Comparison::render).collect::<Vec<_>>().join(" OR ")
            ),
        }
    }
}

impl fmt::Display for CompiledPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledPredicate::Compare(c) => write!(f, "{}", c),
            CompiledPredicate::AnyOf(cs) => {
                f.write_str("(")?;
                for (i, c) in cs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Immutable filter plan (no runtime state)
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    joins: BTreeSet<JoinKind>,
    predicates: Vec<CompiledPredicate>,
    requires_distinct: bool,
}

impl FilterPlan {
    pub(super) fn new(joins: BTreeSet<JoinKind>, predicates: Vec<CompiledPredicate>) -> Self {
        let requires_distinct = joins.iter().any(JoinKind::fans_out);
        Self {
            joins,
            predicates,
            requires_distinct,
        }
    }

    /// Joins in a stable order (properties before organisms)
    pub fn joins(&self) -> impl Iterator<Item = JoinKind> + '_ {
        self.joins.iter().copied()
    }

    pub fn has_join(&self, kind: JoinKind) -> bool {
        self.joins.contains(&kind)
    }

    /// Conjuncts in application order; the first is always the marine scope
    pub fn predicates(&self) -> &[CompiledPredicate] {
        &self.predicates
    }

    /// Set when a fan-out join is present
    pub fn requires_distinct(&self) -> bool {
        self.requires_distinct
    }

    /// All bound values in placeholder order
    pub fn bindings(&self) -> Vec<&BoundValue> {
        self.predicates
            .iter()
            .flat_map(|p| p.comparisons().iter().map(|c| &c.value))
            .collect()
    }

    /// WHERE clause body with `?` placeholders
    pub fn where_sql(&self) -> String {
        self.predicates
            .iter()
            .map(CompiledPredicate::render)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
