//! Aggregation Engine
//!
//! Every aggregation runs in two phases. The filter plan is first resolved
//! to the flat list of matching molecule IDs; the aggregate is then computed
//! against the unjoined properties table, one ID chunk at a time.

use tracing::info;

use crate::executor::{chunk_count, process_in_chunks, QueryExecutor};
use crate::planner::FilterPlan;

use super::bar::bar_series;
use super::errors::AnalyticsResult;
use super::histogram::density_series;
use super::request::{AggregationRequest, AggregationResult, AggregationValues, ChartType};
use super::sunburst::sunburst_tree;

pub struct AggregationEngine<'a, E: QueryExecutor + ?Sized> {
    executor: &'a E,
    batch_size: usize,
}

impl<'a, E: QueryExecutor + ?Sized> AggregationEngine<'a, E> {
    pub fn new(executor: &'a E, batch_size: usize) -> Self {
        Self {
            executor,
            batch_size: batch_size.max(1),
        }
    }

    /// Aggregate the molecules matching `plan`.
    ///
    /// `parameter` is validated before storage is touched. Any storage error
    /// aborts the whole aggregation.
    pub async fn aggregate(
        &self,
        plan: &FilterPlan,
        parameter: &str,
        chart: ChartType,
    ) -> AnalyticsResult<AggregationResult> {
        let request = AggregationRequest::resolve(parameter, chart)?;

        let ids = self.executor.fetch_ids(plan, None).await?;
        info!(
            chart = %chart,
            parameter,
            ids = ids.len(),
            chunks = chunk_count(ids.len(), self.batch_size),
            "aggregating molecules"
        );

        let values = match request {
            AggregationRequest::Bar { column } => {
                let columns = [column];
                let rows = process_in_chunks(&ids, self.batch_size, |chunk| {
                    self.executor.grouped_counts(&columns, chunk)
                })
                .await?;
                AggregationValues::Series(bar_series(rows))
            }
            AggregationRequest::Density { column } => {
                let values = process_in_chunks(&ids, self.batch_size, |chunk| {
                    self.executor.numeric_values(column, chunk)
                })
                .await?;
                AggregationValues::Series(density_series(&values)?)
            }
            AggregationRequest::Sunburst { columns } => {
                let rows = process_in_chunks(&ids, self.batch_size, |chunk| {
                    self.executor.grouped_counts(&columns, chunk)
                })
                .await?;
                AggregationValues::Tree(sunburst_tree(rows))
            }
        };

        Ok(AggregationResult {
            values,
            parameter: parameter.to_string(),
        })
    }
}
