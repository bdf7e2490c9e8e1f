//! Query Plan Compiler
//!
//! Turns a [`ConditionSet`] into a [`FilterPlan`]. Compilation is total:
//! conditions that cannot be compiled are dropped and logged, never reported
//! as errors. Search, export and analyze all go through [`compile`].

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::{
    Column, FieldDescriptor, FieldLocation, FieldRegistry, FieldTarget, JoinKind, ValueKind,
    KEYWORD_COLUMNS, MOLECULES, MOLECULE_ORGANISM, ORGANISMS, ORGANISM_FIELD, ORGANISM_ID_FIELD,
    ORGANISM_MATCH_COLUMNS, PROPERTIES, PROPERTIES_PREFIX,
};
use crate::filter::{ConditionSet, FilterCondition, OperatorKind};

use super::plan::{
    BoundValue, ColumnExpr, ColumnTransform, Comparison, CompiledPredicate, FilterPlan,
    SqlOperator,
};

/// Compile with the process-wide field registry
pub fn compile(set: &ConditionSet) -> FilterPlan {
    PlanCompiler::new(FieldRegistry::global()).compile(set)
}

/// Why a condition produced no predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Incomplete,
    UnknownOperator,
    UnknownField,
    UnsupportedOperator,
    BadValue,
}

impl Skip {
    fn reason(&self) -> &'static str {
        match self {
            Skip::Incomplete => "incomplete condition",
            Skip::UnknownOperator => "unknown operator",
            Skip::UnknownField => "unknown field",
            Skip::UnsupportedOperator => "operator not supported for field",
            Skip::BadValue => "value does not parse for field",
        }
    }
}

pub struct PlanCompiler<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> PlanCompiler<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }

    pub fn compile(&self, set: &ConditionSet) -> FilterPlan {
        let joins = Self::infer_joins(&set.conditions);

        let mut predicates = Vec::with_capacity(set.conditions.len() + 2);
        predicates.push(Self::marine_scope(&joins));

        for condition in &set.conditions {
            match self.compile_condition(condition) {
                Ok(predicate) => predicates.push(predicate),
                Err(skip) => debug!(
                    field = %condition.field,
                    operator = %condition.operator,
                    reason = skip.reason(),
                    "dropping filter condition"
                ),
            }
        }

        if let Some(keyword) = set.keyword.as_deref().filter(|k| !k.is_empty()) {
            predicates.push(Self::keyword_group(keyword));
        }

        let plan = FilterPlan::new(joins, predicates);
        debug!(sql = %plan.where_sql(), distinct = plan.requires_distinct(), "compiled filter plan");
        plan
    }

    /// Joins are decided from field names alone, before any validation
    fn infer_joins(conditions: &[FilterCondition]) -> BTreeSet<JoinKind> {
        let mut joins = BTreeSet::new();
        for condition in conditions {
            if condition.field.starts_with(PROPERTIES_PREFIX) {
                joins.insert(JoinKind::Properties);
            }
            if condition.field == ORGANISM_FIELD || condition.field == ORGANISM_ID_FIELD {
                joins.insert(JoinKind::Organisms);
            }
        }
        joins
    }

    fn marine_scope(joins: &BTreeSet<JoinKind>) -> CompiledPredicate {
        let table = if joins.contains(&JoinKind::Organisms) {
            ORGANISMS.name
        } else {
            MOLECULES.name
        };
        CompiledPredicate::Compare(Comparison::new(
            ColumnExpr::new(table, "is_marine", ColumnTransform::Plain),
            SqlOperator::Eq,
            BoundValue::Boolean(true),
        ))
    }

    fn keyword_group(keyword: &str) -> CompiledPredicate {
        let pattern = format!("%{}%", keyword.to_lowercase());
        CompiledPredicate::AnyOf(
            KEYWORD_COLUMNS
                .into_iter()
                .map(|column| {
                    Comparison::new(
                        ColumnExpr::new(MOLECULES.name, column, ColumnTransform::Lower),
                        SqlOperator::Like,
                        BoundValue::Text(pattern.clone()),
                    )
                })
                .collect(),
        )
    }

    fn compile_condition(&self, condition: &FilterCondition) -> Result<CompiledPredicate, Skip> {
        if !condition.is_complete() {
            return Err(Skip::Incomplete);
        }
        let op = condition.operator_kind().ok_or(Skip::UnknownOperator)?;
        let field = self
            .registry
            .resolve(&condition.field)
            .ok_or(Skip::UnknownField)?;

        match field.target {
            FieldTarget::OrganismText => organism_text(op, &condition.value),
            FieldTarget::OrganismKey => organism_key(op, &condition.value),
            FieldTarget::Column(column) => column_comparison(&field, column, op, &condition.value),
        }
    }
}

fn sql_operator(op: OperatorKind) -> SqlOperator {
    match op {
        OperatorKind::Eq => SqlOperator::Eq,
        OperatorKind::Ne => SqlOperator::Ne,
        OperatorKind::Lt => SqlOperator::Lt,
        OperatorKind::Lte => SqlOperator::Lte,
        OperatorKind::Gt => SqlOperator::Gt,
        OperatorKind::Gte => SqlOperator::Gte,
        OperatorKind::Contains | OperatorKind::StartsWith | OperatorKind::EndsWith => {
            SqlOperator::Like
        }
    }
}

/// Pattern for pattern operators, lower-cased value otherwise
fn text_operand(op: OperatorKind, value: &str) -> BoundValue {
    BoundValue::Text(op.pattern(value).unwrap_or_else(|| value.to_lowercase()))
}

fn organism_text(op: OperatorKind, value: &str) -> Result<CompiledPredicate, Skip> {
    if !(op.is_equality() || op.is_pattern()) {
        return Err(Skip::UnsupportedOperator);
    }
    let operand = text_operand(op, value);
    Ok(CompiledPredicate::AnyOf(
        ORGANISM_MATCH_COLUMNS
            .into_iter()
            .map(|column| {
                Comparison::new(
                    ColumnExpr::new(ORGANISMS.name, column, ColumnTransform::Lower),
                    sql_operator(op),
                    operand.clone(),
                )
            })
            .collect(),
    ))
}

fn organism_key(op: OperatorKind, value: &str) -> Result<CompiledPredicate, Skip> {
    if !op.is_equality() {
        return Err(Skip::UnsupportedOperator);
    }
    let id = value.trim().parse::<i64>().map_err(|_| Skip::BadValue)?;
    Ok(CompiledPredicate::Compare(Comparison::new(
        ColumnExpr::new(
            MOLECULE_ORGANISM.link,
            MOLECULE_ORGANISM.related_key,
            ColumnTransform::Plain,
        ),
        sql_operator(op),
        BoundValue::Integer(id),
    )))
}

fn column_comparison(
    field: &FieldDescriptor,
    column: &'static Column,
    op: OperatorKind,
    value: &str,
) -> Result<CompiledPredicate, Skip> {
    let table = match field.location {
        FieldLocation::JoinedProperties => PROPERTIES.name,
        _ => MOLECULES.name,
    };

    let (transform, operand) = match field.kind {
        ValueKind::Numeric => {
            let transform = if field.location == FieldLocation::JoinedProperties {
                ColumnTransform::CastReal
            } else {
                ColumnTransform::CastInteger
            };
            let operand = if op.is_pattern() {
                text_operand(op, value)
            } else {
                numeric_operand(transform, value).ok_or(Skip::BadValue)?
            };
            (transform, operand)
        }
        ValueKind::Text => (ColumnTransform::Lower, text_operand(op, value)),
    };

    Ok(CompiledPredicate::Compare(Comparison::new(
        ColumnExpr::new(table, column.name, transform),
        sql_operator(op),
        operand,
    )))
}

fn numeric_operand(transform: ColumnTransform, value: &str) -> Option<BoundValue> {
    let value = value.trim();
    if transform == ColumnTransform::CastInteger {
        if let Ok(n) = value.parse::<i64>() {
            return Some(BoundValue::Integer(n));
        }
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(BoundValue::Real)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(field: &str, op: &str, value: &str) -> FilterCondition {
        FilterCondition::new(field, op, value)
    }

    fn single(plan: &FilterPlan) -> &Comparison {
        assert_eq!(plan.predicates().len(), 2, "{:?}", plan);
        match &plan.predicates()[1] {
            CompiledPredicate::Compare(c) => c,
            other => panic!("expected single comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_marine_scope_on_base_record() {
        let plan = compile(&ConditionSet::new());
        assert_eq!(plan.predicates().len(), 1);
        assert_eq!(plan.where_sql(), "molecules.is_marine = ?");
        assert_eq!(plan.bindings(), vec![&BoundValue::Boolean(true)]);
        assert!(!plan.requires_distinct());
    }

    #[test]
    fn test_marine_scope_moves_to_organism() {
        let plan = compile(&ConditionSet::new().and(cond("organism", "contains", "Sponge")));
        assert!(plan.has_join(JoinKind::Organisms));
        assert!(plan.requires_distinct());
        assert_eq!(plan.predicates()[0].to_string(), "organisms.is_marine = TRUE");
    }

    #[test]
    fn test_properties_numeric_cast() {
        let plan = compile(&ConditionSet::new().and(cond(
            "properties.molecular_weight",
            "gte",
            "300",
        )));
        assert!(plan.has_join(JoinKind::Properties));
        assert!(!plan.has_join(JoinKind::Organisms));
        assert_eq!(
            single(&plan).to_string(),
            "CAST(properties.molecular_weight AS REAL) >= 300"
        );
    }

    #[test]
    fn test_base_numeric_integer_cast() {
        let plan = compile(&ConditionSet::new().and(cond("organism_count", "gt", "2")));
        let c = single(&plan);
        assert_eq!(c.column.transform, ColumnTransform::CastInteger);
        assert_eq!(c.value, BoundValue::Integer(2));

        let plan = compile(&ConditionSet::new().and(cond("organism_count", "gt", "2.5")));
        assert_eq!(single(&plan).value, BoundValue::Real(2.5));
    }

    #[test]
    fn test_text_compare_is_case_insensitive() {
        let plan = compile(&ConditionSet::new().and(cond("name", "eq", "Dolastatin 10")));
        assert_eq!(single(&plan).to_string(), "LOWER(molecules.name) = 'dolastatin 10'");

        let plan = compile(&ConditionSet::new().and(cond("cas", "startsWith", "50-")));
        assert_eq!(single(&plan).to_string(), "LOWER(molecules.cas) LIKE '50-%'");
    }

    #[test]
    fn test_numeric_ops_on_text_field_compare_as_text() {
        let plan = compile(&ConditionSet::new().and(cond("annotation_level", "gt", "3")));
        assert_eq!(
            single(&plan).to_string(),
            "LOWER(molecules.annotation_level) > '3'"
        );
    }

    #[test]
    fn test_organism_group_covers_four_columns() {
        let plan = compile(&ConditionSet::new().and(cond("organism", "eq", "Homo")));
        match &plan.predicates()[1] {
            CompiledPredicate::AnyOf(cs) => {
                assert_eq!(cs.len(), 4);
                assert!(cs.iter().all(|c| c.value == BoundValue::Text("homo".into())));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_organism_id() {
        let plan = compile(&ConditionSet::new().and(cond("organism_id", "ne", "42")));
        assert_eq!(
            single(&plan).to_string(),
            "molecule_organism.organism_id != 42"
        );

        // join is still inferred for a dropped organism_id condition
        let plan = compile(&ConditionSet::new().and(cond("organism_id", "eq", "forty")));
        assert_eq!(plan.predicates().len(), 1);
        assert!(plan.has_join(JoinKind::Organisms));

        let plan = compile(&ConditionSet::new().and(cond("organism_id", "gt", "1")));
        assert_eq!(plan.predicates().len(), 1);
    }

    #[test]
    fn test_lenient_drops() {
        let set = ConditionSet::new()
            .and(cond("name", "like", "x"))
            .and(cond("no_such_field", "eq", "x"))
            .and(cond("properties.alogp", "gt", "high"))
            .and(cond("name", "eq", ""))
            .and(cond("cas", "eq", "50-00-0"));
        let plan = compile(&set);
        assert_eq!(plan.predicates().len(), 2);
        assert_eq!(single(&plan).column.column, "cas");
        assert!(plan.has_join(JoinKind::Properties));
    }

    #[test]
    fn test_keyword_group() {
        let plan = compile(&ConditionSet::new().with_keyword("Bryo"));
        match &plan.predicates()[1] {
            CompiledPredicate::AnyOf(cs) => {
                assert_eq!(cs.len(), KEYWORD_COLUMNS.len());
                assert!(cs.iter().all(|c| c.operator == SqlOperator::Like));
                assert_eq!(cs[0].value, BoundValue::Text("%bryo%".into()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let set = ConditionSet::new()
            .and(cond("properties.alogp", "lt", "1.5"))
            .with_keyword("x");
        assert_eq!(compile(&set), compile(&set));
    }
}
