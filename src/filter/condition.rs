//! # Filter Conditions
//!
//! Wire-level representation of user supplied filters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorKind {
    /// Equals
    #[serde(rename = "eq")]
    Eq,

    /// Not equals
    #[serde(rename = "ne")]
    Ne,

    /// Less than
    #[serde(rename = "lt")]
    Lt,

    /// Less than or equal
    #[serde(rename = "lte")]
    Lte,

    /// Greater than
    #[serde(rename = "gt")]
    Gt,

    /// Greater than or equal
    #[serde(rename = "gte")]
    Gte,

    /// Substring match
    #[serde(rename = "contains")]
    Contains,

    /// Prefix match
    #[serde(rename = "startsWith")]
    StartsWith,

    /// Suffix match
    #[serde(rename = "endsWith")]
    EndsWith,
}

impl OperatorKind {
    /// Parse the wire name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let op = match s {
            "eq" => OperatorKind::Eq,
            "ne" => OperatorKind::Ne,
            "lt" => OperatorKind::Lt,
            "lte" => OperatorKind::Lte,
            "gt" => OperatorKind::Gt,
            "gte" => OperatorKind::Gte,
            "contains" => OperatorKind::Contains,
            "startsWith" => OperatorKind::StartsWith,
            "endsWith" => OperatorKind::EndsWith,
            _ => return None,
        };
        Some(op)
    }

    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Eq => "eq",
            OperatorKind::Ne => "ne",
            OperatorKind::Lt => "lt",
            OperatorKind::Lte => "lte",
            OperatorKind::Gt => "gt",
            OperatorKind::Gte => "gte",
            OperatorKind::Contains => "contains",
            OperatorKind::StartsWith => "startsWith",
            OperatorKind::EndsWith => "endsWith",
        }
    }

    /// True for the operators that compile to a LIKE pattern
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            OperatorKind::Contains | OperatorKind::StartsWith | OperatorKind::EndsWith
        )
    }

    /// True for `eq` and `ne`
    pub fn is_equality(&self) -> bool {
        matches!(self, OperatorKind::Eq | OperatorKind::Ne)
    }

    /// Lower-case the value and wrap it in wildcards for pattern operators
    pub fn pattern(&self, value: &str) -> Option<String> {
        let lowered = value.to_lowercase();
        match self {
            OperatorKind::Contains => Some(format!("%{}%", lowered)),
            OperatorKind::StartsWith => Some(format!("{}%", lowered)),
            OperatorKind::EndsWith => Some(format!("%{}", lowered)),
            _ => None,
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw `(field, operator, value)` triple.
///
/// All three parts stay untyped text until compilation so that a malformed
/// condition keeps its position in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterCondition {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Parse `field:operator:value`; the value may itself contain colons
    pub fn from_arg(arg: &str) -> Option<Self> {
        let mut parts = arg.splitn(3, ':');
        let field = parts.next()?;
        let operator = parts.next()?;
        let value = parts.next()?;
        Some(Self::new(field, operator, value))
    }

    /// All three parts empty: the end-of-list marker
    pub fn is_end_marker(&self) -> bool {
        self.field.is_empty() && self.operator.is_empty() && self.value.is_empty()
    }

    /// Every part present; incomplete conditions compile to nothing
    pub fn is_complete(&self) -> bool {
        !self.field.is_empty() && !self.operator.is_empty() && !self.value.is_empty()
    }

    pub fn operator_kind(&self) -> Option<OperatorKind> {
        OperatorKind::parse(&self.operator)
    }
}

/// Parsed filter input for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionSet {
    pub conditions: Vec<FilterCondition>,
    pub keyword: Option<String>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = if keyword.is_empty() { None } else { Some(keyword) };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.keyword.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parse() {
        assert_eq!(OperatorKind::parse("gte"), Some(OperatorKind::Gte));
        assert_eq!(OperatorKind::parse("startsWith"), Some(OperatorKind::StartsWith));
        assert_eq!(OperatorKind::parse("startswith"), None);
        assert_eq!(OperatorKind::parse("like"), None);
    }

    #[test]
    fn test_operator_round_trips_as_str() {
        for op in [
            OperatorKind::Eq,
            OperatorKind::Ne,
            OperatorKind::Lt,
            OperatorKind::Lte,
            OperatorKind::Gt,
            OperatorKind::Gte,
            OperatorKind::Contains,
            OperatorKind::StartsWith,
            OperatorKind::EndsWith,
        ] {
            assert_eq!(OperatorKind::parse(op.as_str()), Some(op));
        }
    }

    #[test]
    fn test_patterns_lowercase_and_wrap() {
        assert_eq!(
            OperatorKind::Contains.pattern("Streptomyces"),
            Some("%streptomyces%".to_string())
        );
        assert_eq!(OperatorKind::StartsWith.pattern("AB"), Some("ab%".to_string()));
        assert_eq!(OperatorKind::EndsWith.pattern("Cd"), Some("%cd".to_string()));
        assert_eq!(OperatorKind::Eq.pattern("x"), None);
    }

    #[test]
    fn test_condition_from_arg() {
        let c = FilterCondition::from_arg("properties.alogp:gt:1.5").unwrap();
        assert_eq!(c.field, "properties.alogp");
        assert_eq!(c.operator, "gt");
        assert_eq!(c.value, "1.5");

        let c = FilterCondition::from_arg("name:eq:a:b").unwrap();
        assert_eq!(c.value, "a:b");

        assert!(FilterCondition::from_arg("name:eq").is_none());
    }

    #[test]
    fn test_condition_completeness() {
        assert!(FilterCondition::new("a", "eq", "1").is_complete());
        assert!(!FilterCondition::new("a", "", "1").is_complete());
        assert!(FilterCondition::default().is_end_marker());
        assert!(!FilterCondition::new("", "", "1").is_end_marker());
    }

    #[test]
    fn test_empty_keyword_is_none() {
        let set = ConditionSet::new().with_keyword("");
        assert!(set.keyword.is_none());
        assert!(set.is_empty());
    }
}
