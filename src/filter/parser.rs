//! # Query Parameter Parser
//!
//! Parses request query parameters into condition sets and paging input.

use std::collections::HashMap;

use super::condition::{ConditionSet, FilterCondition};

/// Default page size if not specified
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Parse `conditions[i][field|operator|value]` triples in index order.
///
/// Parsing stops at the first index whose three parts are all empty.
/// Partially filled triples are kept so later indices do not shift.
pub fn parse_conditions(params: &HashMap<String, String>) -> ConditionSet {
    let mut conditions = Vec::new();

    for i in 0.. {
        let part = |name: &str| {
            params
                .get(&format!("conditions[{}][{}]", i, name))
                .cloned()
                .unwrap_or_default()
        };
        let condition = FilterCondition::new(part("field"), part("operator"), part("value"));
        if condition.is_end_marker() {
            break;
        }
        conditions.push(condition);
    }

    let set = ConditionSet {
        conditions,
        keyword: None,
    };
    match params.get("keyword") {
        Some(keyword) => set.with_keyword(keyword.as_str()),
        None => set,
    }
}

/// Paging, ordering and plain-search parameters shared by list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: u64,
    pub per_page: u64,
    /// Requested order column, unvalidated
    pub order_by: Option<String>,
    pub descending: bool,
    /// `query` parameter of entity list endpoints
    pub search: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            order_by: None,
            descending: false,
            search: None,
        }
    }
}

impl PageParams {
    /// Parse paging parameters; bad or non-positive numbers fall back to defaults
    pub fn parse(params: &HashMap<String, String>) -> Self {
        let page = first_of(params, &["page", "pageNumber"])
            .and_then(parse_positive)
            .unwrap_or(1);
        let per_page = first_of(params, &["perPage", "perPageNumber"])
            .and_then(parse_positive)
            .unwrap_or(DEFAULT_PER_PAGE);
        let order_by = params
            .get("orderByString")
            .filter(|s| !s.is_empty())
            .cloned();
        let descending = params
            .get("orderDir")
            .map(|d| d.eq_ignore_ascii_case("desc"))
            .unwrap_or(false);
        let search = params.get("query").filter(|s| !s.is_empty()).cloned();

        Self {
            page,
            per_page,
            order_by,
            descending,
            search,
        }
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

fn first_of<'a>(params: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| params.get(*k))
        .map(String::as_str)
}

fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}
