//! SQL rendering of filter plans
//!
//! Applies a [`FilterPlan`] to an `sqlx::QueryBuilder`. Identifiers are
//! pushed as text taken from the catalog schema; every value goes through
//! `push_bind`.

use sqlx::{QueryBuilder, Sqlite};

use crate::catalog::{
    Column, JoinKind, StorageType, Table, MOLECULES, MOLECULE_ORGANISM, ORGANISMS, PROPERTIES,
};
use crate::filter::PageParams;
use crate::planner::{BoundValue, Comparison, CompiledPredicate, FilterPlan};

pub(crate) type Builder<'args> = QueryBuilder<'args, Sqlite>;

/// `FROM molecules` plus the plan's joins
pub(crate) fn push_from(builder: &mut Builder<'_>, plan: &FilterPlan) {
    builder.push(" FROM ");
    builder.push(MOLECULES.name);
    for join in plan.joins() {
        match join {
            JoinKind::Properties => {
                builder.push(format!(
                    " JOIN {p} ON {p}.molecule_id = {m}.id",
                    p = PROPERTIES.name,
                    m = MOLECULES.name
                ));
            }
            JoinKind::Organisms => {
                builder.push(format!(
                    " JOIN {l} ON {l}.{mk} = {m}.id JOIN {o} ON {o}.id = {l}.{rk}",
                    l = MOLECULE_ORGANISM.link,
                    mk = MOLECULE_ORGANISM.molecule_key,
                    rk = MOLECULE_ORGANISM.related_key,
                    m = MOLECULES.name,
                    o = ORGANISMS.name
                ));
            }
        }
    }
}

/// `WHERE p1 AND p2 ...`
pub(crate) fn push_where(builder: &mut Builder<'_>, plan: &FilterPlan) {
    for (i, predicate) in plan.predicates().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(builder, predicate);
    }
}

pub(crate) fn push_predicate(builder: &mut Builder<'_>, predicate: &CompiledPredicate) {
    match predicate {
        CompiledPredicate::Compare(c) => push_comparison(builder, c),
        CompiledPredicate::AnyOf(cs) => {
            builder.push("(");
            for (i, c) in cs.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_comparison(builder, c);
            }
            builder.push(")");
        }
    }
}

fn push_comparison(builder: &mut Builder<'_>, comparison: &Comparison) {
    builder.push(comparison.column.render());
    builder.push(" ");
    builder.push(comparison.operator.as_sql());
    builder.push(" ");
    push_value(builder, &comparison.value);
}

pub(crate) fn push_value(builder: &mut Builder<'_>, value: &BoundValue) {
    match value {
        BoundValue::Integer(v) => builder.push_bind(*v),
        BoundValue::Real(v) => builder.push_bind(*v),
        BoundValue::Text(v) => builder.push_bind(v.clone()),
        BoundValue::Boolean(v) => builder.push_bind(*v),
    };
}

/// `column IN (?, ?, ...)` over one chunk of IDs
pub(crate) fn push_id_list(builder: &mut Builder<'_>, column: &str, ids: &[i64]) {
    builder.push(column);
    builder.push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// `(LOWER(t.a) LIKE ? OR LOWER(t.b) LIKE ?)` for a plain-text search
pub(crate) fn push_text_search(
    builder: &mut Builder<'_>,
    table: &Table,
    columns: &[&str],
    search: &str,
) {
    let pattern = format!("%{}%", search.to_lowercase());
    builder.push("(");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(format!("LOWER({}.{}) LIKE ", table.name, column));
        builder.push_bind(pattern.clone());
    }
    builder.push(")");
}

/// Text rendering of a column used as a group label
pub(crate) fn label_expr(table: &Table, column: &Column) -> String {
    let qualified = table.qualified(column);
    match column.storage {
        StorageType::Boolean => format!(
            "CASE WHEN {c} IS NULL THEN NULL WHEN {c} THEN 'true' ELSE 'false' END",
            c = qualified
        ),
        _ => format!("CAST({} AS TEXT)", qualified),
    }
}

/// Order column requested by the page, if it names a column of `table`
pub(crate) fn order_column(table: &Table, page: &PageParams) -> Option<String> {
    page.order_by
        .as_deref()
        .and_then(|name| table.column(name))
        .map(|column| table.qualified(column))
}

/// `ORDER BY <requested> <dir>, <table>.id ASC`
pub(crate) fn push_order(builder: &mut Builder<'_>, table: &Table, page: &PageParams) {
    builder.push(" ORDER BY ");
    if let Some(column) = order_column(table, page) {
        builder.push(column);
        builder.push(if page.descending { " DESC, " } else { " ASC, " });
    }
    builder.push(format!("{}.id ASC", table.name));
}

/// `LIMIT ? OFFSET ?`
pub(crate) fn push_limit(builder: &mut Builder<'_>, limit: u64, offset: u64) {
    builder.push(" LIMIT ");
    builder.push_bind(to_sql_int(limit));
    builder.push(" OFFSET ");
    builder.push_bind(to_sql_int(offset));
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
