//! Aggregation requests and results

use std::fmt;

use serde::Serialize;

use crate::catalog::{Column, FieldRegistry, PROPERTIES};

use super::errors::{AnalyticsError, AnalyticsResult};

/// Requested visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Density,
    Sunburst,
}

impl ChartType {
    /// Parse the `chart_type` parameter; missing or unknown values mean bar
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("density") => ChartType::Density,
            Some("sunburst") => ChartType::Sunburst,
            _ => ChartType::Bar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Density => "density",
            ChartType::Sunburst => "sunburst",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed three-level classification hierarchies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunburstScheme {
    /// superclass → class → subclass
    ClassyFire,
    /// pathway → superclass → class
    NpClassifier,
}

impl SunburstScheme {
    pub fn parse(parameter: &str) -> Option<Self> {
        match parameter {
            "classifire" => Some(SunburstScheme::ClassyFire),
            "np_classifier" => Some(SunburstScheme::NpClassifier),
            _ => None,
        }
    }

    /// Properties columns from the top level down
    pub fn columns(&self) -> [&'static str; 3] {
        match self {
            SunburstScheme::ClassyFire => [
                "chemical_super_class",
                "chemical_class",
                "chemical_sub_class",
            ],
            SunburstScheme::NpClassifier => [
                "np_classifier_pathway",
                "np_classifier_superclass",
                "np_classifier_class",
            ],
        }
    }
}

/// A validated aggregation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationRequest {
    Bar { column: &'static Column },
    Density { column: &'static Column },
    Sunburst { columns: Vec<&'static Column> },
}

impl AggregationRequest {
    /// Validate `parameter` for the chart type before any storage access
    pub fn resolve(parameter: &str, chart: ChartType) -> AnalyticsResult<Self> {
        let unknown = || AnalyticsError::UnknownParameter {
            parameter: parameter.to_string(),
            chart: chart.to_string(),
        };

        match chart {
            ChartType::Bar => FieldRegistry::global()
                .property_column(parameter)
                .map(|column| AggregationRequest::Bar { column })
                .ok_or_else(unknown),
            ChartType::Density => FieldRegistry::global()
                .property_column(parameter)
                .filter(|column| column.storage.is_numeric())
                .map(|column| AggregationRequest::Density { column })
                .ok_or_else(unknown),
            ChartType::Sunburst => {
                let scheme = SunburstScheme::parse(parameter).ok_or_else(unknown)?;
                let columns = scheme
                    .columns()
                    .into_iter()
                    .map(|name| PROPERTIES.column(name).ok_or_else(unknown))
                    .collect::<AnalyticsResult<Vec<_>>>()?;
                Ok(AggregationRequest::Sunburst { columns })
            }
        }
    }
}

/// `{label, value}` entry of bar and density series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledCount {
    pub label: String,
    pub value: u64,
}

impl LabeledCount {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Node of a sunburst tree; carries either children or a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunburstNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SunburstNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

impl SunburstNode {
    pub fn branch(name: impl Into<String>, children: Vec<SunburstNode>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
            value: None,
        }
    }

    pub fn leaf(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            children: None,
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AggregationValues {
    Series(Vec<LabeledCount>),
    Tree(Vec<SunburstNode>),
}

impl AggregationValues {
    pub fn len(&self) -> usize {
        match self {
            AggregationValues::Series(v) => v.len(),
            AggregationValues::Tree(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `{values, parameter}` payload of the analyze endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub values: AggregationValues,
    pub parameter: String,
}
