//! Query Executor
//!
//! [`QueryExecutor`] is the storage seam consumed by the search, export and
//! analytics paths. [`SqliteExecutor`] implements it over a pooled SQLite
//! handle and adds the entity lookups served by the catalog endpoints.
//!
//! Filtered molecule reads always run in two steps: resolve the ordered page
//! of matching IDs through the plan, then load and hydrate those IDs in
//! batches. Hydration never touches the plan's joins.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::catalog::{
    Column, Entity, Relation, StorageType, Table, MOLECULES, MOLECULE_GEO_LOCATION,
    MOLECULE_ORGANISM, MOLECULE_SEARCH_COLUMNS, ORGANISMS, PROPERTIES, RANGE_COLUMNS,
};
use crate::filter::PageParams;
use crate::planner::FilterPlan;

use super::batch::{process_in_chunks, DEFAULT_ID_BATCH_SIZE};
use super::errors::{ExecutorError, ExecutorResult};
use super::records::{decode_key, decode_named, decode_record, record_id, Record};
use super::sql::{
    label_expr, order_column, push_from, push_id_list, push_limit, push_order, push_text_search,
    push_where, Builder,
};

/// Maximum number of autocomplete suggestions
pub const AUTOCOMPLETE_LIMIT: i64 = 10;

/// Count of properties rows sharing one combination of group labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    /// One label per grouped column; `None` for SQL NULL
    pub labels: Vec<Option<String>>,
    pub count: u64,
}

/// One page of records plus the total number of matches
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub records: Vec<Record>,
    pub total: u64,
}

impl PageResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Marine record counts for the statistics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub molecules: u64,
    pub organisms: u64,
}

/// Which organisms are attached to hydrated molecules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganismScope {
    All,
    MarineOnly,
}

/// Storage operations driven by a compiled [`FilterPlan`]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Number of distinct molecules matching the plan
    async fn count(&self, plan: &FilterPlan) -> ExecutorResult<u64>;

    /// Ordered page of hydrated molecule records
    async fn fetch_page(&self, plan: &FilterPlan, page: &PageParams)
        -> ExecutorResult<Vec<Record>>;

    /// Matching molecule IDs; every match when `page` is `None`
    async fn fetch_ids(
        &self,
        plan: &FilterPlan,
        page: Option<&PageParams>,
    ) -> ExecutorResult<Vec<i64>>;

    /// Properties rows of one ID chunk grouped by `columns`
    async fn grouped_counts(
        &self,
        columns: &[&'static Column],
        ids: &[i64],
    ) -> ExecutorResult<Vec<GroupCount>>;

    /// Non-null values of a numeric properties column for one ID chunk
    async fn numeric_values(&self, column: &'static Column, ids: &[i64])
        -> ExecutorResult<Vec<f64>>;
}

/// SQLite-backed executor
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
    id_batch_size: usize,
}

impl SqliteExecutor {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            id_batch_size: DEFAULT_ID_BATCH_SIZE,
        }
    }

    /// Open a pool on an existing database file
    pub async fn connect(path: &str, max_connections: u32) -> ExecutorResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path))?
            .create_if_missing(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn with_id_batch_size(mut self, id_batch_size: usize) -> Self {
        self.id_batch_size = id_batch_size.max(1);
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn id_batch_size(&self) -> usize {
        self.id_batch_size
    }

    // ==================
    // Molecules
    // ==================

    /// Molecule by its public identifier, with marine organisms only
    pub async fn molecule_by_identifier(&self, identifier: &str) -> ExecutorResult<Option<Record>> {
        let mut builder = Builder::new(format!(
            "SELECT CAST({m}.id AS INTEGER) AS id FROM {m} WHERE {m}.identifier = ",
            m = MOLECULES.name
        ));
        builder.push_bind(identifier.to_string());
        builder.push(" LIMIT 1");

        let row = builder.build().fetch_optional(&self.pool).await?;
        let id = match row {
            Some(row) => decode_key(&row, "id")?,
            None => return Ok(None),
        };

        let mut records = self.load_molecules(&[id], OrganismScope::MarineOnly).await?;
        Ok(records.pop())
    }

    /// Minimum and maximum of each headline numeric property
    pub async fn property_ranges(&self) -> ExecutorResult<Record> {
        let columns: Vec<&'static Column> = RANGE_COLUMNS
            .into_iter()
            .filter_map(|name| PROPERTIES.column(name))
            .collect();

        let select = columns
            .iter()
            .map(|c| {
                let cast = c.storage.cast_target();
                format!(
                    "CAST(MIN({q}) AS {t}) AS min_{n}, CAST(MAX({q}) AS {t}) AS max_{n}",
                    q = PROPERTIES.qualified(c),
                    t = cast,
                    n = c.name
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let row = Builder::new(format!("SELECT {} FROM {}", select, PROPERTIES.name))
            .build()
            .fetch_one(&self.pool)
            .await?;

        let mut ranges = Map::new();
        for column in columns {
            let min = decode_named(&row, &format!("min_{}", column.name), column.storage)?;
            let max = decode_named(&row, &format!("max_{}", column.name), column.storage)?;
            ranges.insert(column.name.to_string(), json!({ "min": min, "max": max }));
        }
        Ok(ranges)
    }

    // ==================
    // Catalog entities
    // ==================

    pub async fn statistics(&self) -> ExecutorResult<CatalogCounts> {
        let molecules = self.count_marine(&MOLECULES).await?;
        let organisms = self.count_marine(&ORGANISMS).await?;
        Ok(CatalogCounts {
            molecules,
            organisms,
        })
    }

    async fn count_marine(&self, table: &Table) -> ExecutorResult<u64> {
        let count: i64 = Builder::new(format!(
            "SELECT COUNT(*) FROM {t} WHERE {t}.is_marine = 1",
            t = table.name
        ))
        .build_query_scalar::<i64>()
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    /// Marine organisms whose name matches `search`, as `{label, value}`
    pub async fn autocomplete_organisms(&self, search: &str) -> ExecutorResult<Vec<Value>> {
        if search.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = Builder::new(format!(
            "SELECT CAST({o}.name AS TEXT) AS name, CAST({o}.aphiaid_worms AS INTEGER) AS aphiaid_worms FROM {o} WHERE {o}.is_marine = 1 AND ",
            o = ORGANISMS.name
        ));
        push_text_search(&mut builder, &ORGANISMS, &["name", "name_aphia_worms"], search);
        push_order(&mut builder, &ORGANISMS, &PageParams::default());
        builder.push(" LIMIT ");
        builder.push_bind(AUTOCOMPLETE_LIMIT);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                Ok(json!({
                    "label": decode_named(row, "name", StorageType::Text)?,
                    "value": decode_named(row, "aphiaid_worms", StorageType::Integer)?,
                }))
            })
            .collect()
    }

    /// Paged entity list honouring the `query` search and marine scope
    pub async fn list_entities(
        &self,
        entity: &Entity,
        page: &PageParams,
    ) -> ExecutorResult<PageResult> {
        let table = entity.table;

        let mut count = Builder::new(format!("SELECT COUNT(*) FROM {}", table.name));
        push_entity_filter(&mut count, entity, page);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = Builder::new(format!(
            "SELECT {} FROM {}",
            table.select_list(),
            table.name
        ));
        push_entity_filter(&mut select, entity, page);
        push_order(&mut select, table, page);
        push_limit(&mut select, page.per_page, page.offset());

        let rows = select.build().fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(|row| decode_record(table, row))
            .collect::<ExecutorResult<Vec<_>>>()?;

        Ok(PageResult {
            records,
            total: total.max(0) as u64,
        })
    }

    pub async fn entity_by_id(&self, entity: &Entity, id: i64) -> ExecutorResult<Option<Record>> {
        let table = entity.table;
        let mut builder = Builder::new(format!(
            "SELECT {} FROM {t} WHERE {t}.id = ",
            table.select_list(),
            t = table.name
        ));
        builder.push_bind(id);

        let row = builder.build().fetch_optional(&self.pool).await?;
        row.map(|row| decode_record(table, &row)).transpose()
    }

    /// Paged, hydrated molecules linked to one entity
    pub async fn entity_molecules(
        &self,
        entity: &Entity,
        id: i64,
        page: &PageParams,
    ) -> ExecutorResult<PageResult> {
        let relation = match entity.molecules {
            Some(relation) => relation,
            None => return Ok(PageResult::empty()),
        };

        let mut count = Builder::new(format!("SELECT COUNT(DISTINCT {}.id)", MOLECULES.name));
        push_related_filter(&mut count, entity, relation, id, page);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = Builder::new(format!("SELECT DISTINCT {}.id AS id", MOLECULES.name));
        if let Some(column) = order_column(&MOLECULES, page) {
            select.push(format!(", {}", column));
        }
        push_related_filter(&mut select, entity, relation, id, page);
        push_order(&mut select, &MOLECULES, page);
        push_limit(&mut select, page.per_page, page.offset());

        let rows = select.build().fetch_all(&self.pool).await?;
        let ids = rows
            .iter()
            .map(|row| decode_key(row, "id"))
            .collect::<ExecutorResult<Vec<_>>>()?;

        Ok(PageResult {
            records: self.load_molecules(&ids, OrganismScope::All).await?,
            total: total.max(0) as u64,
        })
    }

    // ==================
    // Hydration
    // ==================

    /// Load molecules by ID in the given order and attach their sub-records
    async fn load_molecules(
        &self,
        ids: &[i64],
        organisms: OrganismScope,
    ) -> ExecutorResult<Vec<Record>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = process_in_chunks(ids, self.id_batch_size, |chunk| {
            self.molecule_rows(chunk)
        })
        .await?;
        let mut by_id: HashMap<i64, Record> = rows
            .into_iter()
            .filter_map(|record| record_id(&record).map(|id| (id, record)))
            .collect();

        let mut properties: HashMap<i64, Record> =
            process_in_chunks(ids, self.id_batch_size, |chunk| self.property_rows(chunk))
                .await?
                .into_iter()
                .collect();

        let marine_only = organisms == OrganismScope::MarineOnly;
        let mut organisms = group_by_molecule(
            process_in_chunks(ids, self.id_batch_size, |chunk| {
                self.related_rows(&MOLECULE_ORGANISM, chunk, marine_only)
            })
            .await?,
        );
        let mut locations = group_by_molecule(
            process_in_chunks(ids, self.id_batch_size, |chunk| {
                self.related_rows(&MOLECULE_GEO_LOCATION, chunk, false)
            })
            .await?,
        );

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(mut record) = by_id.remove(id) else {
                continue;
            };
            record.insert(
                "properties".to_string(),
                properties.remove(id).map(Value::Object).unwrap_or(Value::Null),
            );
            record.insert(
                "organisms".to_string(),
                Value::Array(organisms.remove(id).unwrap_or_default()),
            );
            record.insert(
                "geo_locations".to_string(),
                Value::Array(locations.remove(id).unwrap_or_default()),
            );
            out.push(record);
        }
        debug!(requested = ids.len(), loaded = out.len(), "hydrated molecules");
        Ok(out)
    }

    async fn molecule_rows(&self, ids: &[i64]) -> ExecutorResult<Vec<Record>> {
        let mut builder = Builder::new(format!(
            "SELECT {} FROM {} WHERE ",
            MOLECULES.select_list(),
            MOLECULES.name
        ));
        push_id_list(&mut builder, &format!("{}.id", MOLECULES.name), ids);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(|row| decode_record(&MOLECULES, row)).collect()
    }

    async fn property_rows(&self, ids: &[i64]) -> ExecutorResult<Vec<(i64, Record)>> {
        let mut builder = Builder::new(format!(
            "SELECT {} FROM {} WHERE ",
            PROPERTIES.select_list(),
            PROPERTIES.name
        ));
        push_id_list(&mut builder, &format!("{}.molecule_id", PROPERTIES.name), ids);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| Ok((decode_key(row, "molecule_id")?, decode_record(&PROPERTIES, row)?)))
            .collect()
    }

    async fn related_rows(
        &self,
        relation: &Relation,
        ids: &[i64],
        marine_only: bool,
    ) -> ExecutorResult<Vec<(i64, Value)>> {
        let related = relation.related;
        let mut builder = Builder::new(format!(
            "SELECT CAST({l}.{mk} AS INTEGER) AS link_molecule_id, {cols} FROM {l} JOIN {r} ON {r}.id = {l}.{rk} WHERE ",
            l = relation.link,
            mk = relation.molecule_key,
            rk = relation.related_key,
            r = related.name,
            cols = related.select_list()
        ));
        if marine_only {
            builder.push(format!("{}.is_marine = 1 AND ", related.name));
        }
        push_id_list(
            &mut builder,
            &format!("{}.{}", relation.link, relation.molecule_key),
            ids,
        );
        builder.push(format!(" ORDER BY {}.id ASC", related.name));

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                Ok((
                    decode_key(row, "link_molecule_id")?,
                    Value::Object(decode_record(related, row)?),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn count(&self, plan: &FilterPlan) -> ExecutorResult<u64> {
        let select = if plan.requires_distinct() {
            format!("SELECT COUNT(DISTINCT {}.id)", MOLECULES.name)
        } else {
            "SELECT COUNT(*)".to_string()
        };
        let mut builder = Builder::new(select);
        push_from(&mut builder, plan);
        push_where(&mut builder, plan);

        let total: i64 = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn fetch_page(
        &self,
        plan: &FilterPlan,
        page: &PageParams,
    ) -> ExecutorResult<Vec<Record>> {
        let ids = self.fetch_ids(plan, Some(page)).await?;
        self.load_molecules(&ids, OrganismScope::All).await
    }

    async fn fetch_ids(
        &self,
        plan: &FilterPlan,
        page: Option<&PageParams>,
    ) -> ExecutorResult<Vec<i64>> {
        let mut builder = Builder::new("SELECT ");
        if plan.requires_distinct() {
            builder.push("DISTINCT ");
        }
        builder.push(format!("{}.id AS id", MOLECULES.name));

        match page {
            Some(page) => {
                if let Some(column) = order_column(&MOLECULES, page) {
                    builder.push(format!(", {}", column));
                }
                push_from(&mut builder, plan);
                push_where(&mut builder, plan);
                push_order(&mut builder, &MOLECULES, page);
                push_limit(&mut builder, page.per_page, page.offset());
            }
            None => {
                push_from(&mut builder, plan);
                push_where(&mut builder, plan);
                push_order(&mut builder, &MOLECULES, &PageParams::default());
            }
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(|row| decode_key(row, "id")).collect()
    }

    async fn grouped_counts(
        &self,
        columns: &[&'static Column],
        ids: &[i64],
    ) -> ExecutorResult<Vec<GroupCount>> {
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let labels = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} AS g{}", label_expr(&PROPERTIES, c), i))
            .collect::<Vec<_>>()
            .join(", ");
        let groups = (0..columns.len())
            .map(|i| format!("g{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let mut builder = Builder::new(format!(
            "SELECT {}, COUNT(*) AS group_count FROM {} WHERE ",
            labels, PROPERTIES.name
        ));
        push_id_list(&mut builder, &format!("{}.molecule_id", PROPERTIES.name), ids);
        builder.push(format!(" GROUP BY {}", groups));

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                let labels = (0..columns.len())
                    .map(|i| {
                        let name = format!("g{}", i);
                        decode_named(row, &name, StorageType::Text).map(|v| match v {
                            Value::String(s) => Some(s),
                            _ => None,
                        })
                    })
                    .collect::<ExecutorResult<Vec<_>>>()?;
                let count = decode_key(row, "group_count")?;
                Ok(GroupCount {
                    labels,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }

    async fn numeric_values(
        &self,
        column: &'static Column,
        ids: &[i64],
    ) -> ExecutorResult<Vec<f64>> {
        let qualified = PROPERTIES.qualified(column);
        let mut builder = Builder::new(format!(
            "SELECT CAST({q} AS REAL) AS value FROM {t} WHERE {q} IS NOT NULL AND ",
            q = qualified,
            t = PROPERTIES.name
        ));
        push_id_list(&mut builder, &format!("{}.molecule_id", PROPERTIES.name), ids);

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            match decode_named(row, "value", StorageType::Real)? {
                Value::Number(n) => values.push(n.as_f64().ok_or_else(|| {
                    ExecutorError::decode(column.name, "value out of range")
                })?),
                _ => continue,
            }
        }
        Ok(values)
    }
}

/// WHERE clause of an entity list
fn push_entity_filter(builder: &mut Builder<'_>, entity: &Entity, page: &PageParams) {
    let mut clauses = 0;

    if entity.marine_only {
        builder.push(" WHERE ");
        builder.push(format!("{}.is_marine = 1", entity.table.name));
        clauses += 1;
    }
    if let Some(search) = page.search.as_deref() {
        builder.push(if clauses == 0 { " WHERE " } else { " AND " });
        push_text_search(builder, entity.table, entity.search_columns, search);
    }
}

/// FROM/WHERE of the molecules linked to one entity
fn push_related_filter(
    builder: &mut Builder<'_>,
    entity: &Entity,
    relation: &Relation,
    id: i64,
    page: &PageParams,
) {
    builder.push(format!(
        " FROM {m} JOIN {l} ON {l}.{mk} = {m}.id WHERE {l}.{rk} = ",
        m = MOLECULES.name,
        l = relation.link,
        mk = relation.molecule_key,
        rk = relation.related_key
    ));
    builder.push_bind(id);
    if entity.marine_molecules_only {
        builder.push(format!(" AND {}.is_marine = 1", MOLECULES.name));
    }
    if let Some(search) = page.search.as_deref() {
        builder.push(" AND ");
        push_text_search(builder, &MOLECULES, &MOLECULE_SEARCH_COLUMNS, search);
    }
}

fn group_by_molecule(rows: Vec<(i64, Value)>) -> HashMap<i64, Vec<Value>> {
    let mut grouped: HashMap<i64, Vec<Value>> = HashMap::new();
    for (molecule_id, value) in rows {
        grouped.entry(molecule_id).or_default().push(value);
    }
    grouped
}
