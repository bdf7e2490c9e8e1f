//! Field Registry
//!
//! Resolves the field name of a filter condition to a tagged descriptor.
//! The mapping is built once from the static schema and never mutated.
//! An unresolved field is not an error: callers drop the condition.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::schema::{Column, ValueKind, MOLECULES, PROPERTIES};

/// Prefix selecting a column of the properties sub-record
pub const PROPERTIES_PREFIX: &str = "properties.";

/// Pseudo-field matched against the organism text columns
pub const ORGANISM_FIELD: &str = "organism";

/// Pseudo-field matched against the organism join key
pub const ORGANISM_ID_FIELD: &str = "organism_id";

/// Where a field lives relative to the base molecule record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    Base,
    JoinedProperties,
    JoinedOrganism,
}

/// Join a field needs in the query plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JoinKind {
    /// 1:1 properties sub-record
    Properties,
    /// Many-to-many organism relation
    Organisms,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Properties => "properties",
            JoinKind::Organisms => "organisms",
        }
    }

    /// Whether joining can multiply base rows
    pub fn fans_out(&self) -> bool {
        matches!(self, JoinKind::Organisms)
    }
}

/// What a resolved field compiles against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    /// A single storage column of `molecules` or `properties`
    Column(&'static Column),
    /// The organism text columns, matched as one OR-group
    OrganismText,
    /// The organism join key
    OrganismKey,
}

/// Static metadata for one filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub location: FieldLocation,
    pub kind: ValueKind,
    pub target: FieldTarget,
}

impl FieldDescriptor {
    /// Join the plan must carry for this field, if any
    pub fn required_join(&self) -> Option<JoinKind> {
        match self.location {
            FieldLocation::Base => None,
            FieldLocation::JoinedProperties => Some(JoinKind::Properties),
            FieldLocation::JoinedOrganism => Some(JoinKind::Organisms),
        }
    }
}

/// Lookup of filterable fields by request name
pub struct FieldRegistry {
    fields: HashMap<String, FieldDescriptor>,
}

impl FieldRegistry {
    fn build() -> Self {
        let mut fields = HashMap::new();

        for column in MOLECULES.iter() {
            fields.insert(
                column.name.to_string(),
                FieldDescriptor {
                    name: column.name,
                    location: FieldLocation::Base,
                    kind: column.kind,
                    target: FieldTarget::Column(column),
                },
            );
        }

        for column in PROPERTIES.iter() {
            fields.insert(
                format!("{}{}", PROPERTIES_PREFIX, column.name),
                FieldDescriptor {
                    name: column.name,
                    location: FieldLocation::JoinedProperties,
                    kind: column.kind,
                    target: FieldTarget::Column(column),
                },
            );
        }

        fields.insert(
            ORGANISM_FIELD.to_string(),
            FieldDescriptor {
                name: ORGANISM_FIELD,
                location: FieldLocation::JoinedOrganism,
                kind: ValueKind::Text,
                target: FieldTarget::OrganismText,
            },
        );
        fields.insert(
            ORGANISM_ID_FIELD.to_string(),
            FieldDescriptor {
                name: ORGANISM_ID_FIELD,
                location: FieldLocation::JoinedOrganism,
                kind: ValueKind::Numeric,
                target: FieldTarget::OrganismKey,
            },
        );

        Self { fields }
    }

    /// The process-wide registry
    pub fn global() -> &'static FieldRegistry {
        static REGISTRY: OnceLock<FieldRegistry> = OnceLock::new();
        REGISTRY.get_or_init(FieldRegistry::build)
    }

    /// Resolve a request field name. `None` means "drop this condition".
    pub fn resolve(&self, field: &str) -> Option<FieldDescriptor> {
        self.fields.get(field).copied()
    }

    /// Resolve a properties column named with or without the prefix
    pub fn property_column(&self, name: &str) -> Option<&'static Column> {
        let bare = name.strip_prefix(PROPERTIES_PREFIX).unwrap_or(name);
        PROPERTIES.column(bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_property_fields() {
        let registry = FieldRegistry::global();
        for name in [
            "heavy_atom_count",
            "total_atom_count",
            "rotatable_bond_count",
            "hydrogen_bond_acceptors",
            "hydrogen_bond_donors",
            "hydrogen_bond_acceptors_lipinski",
            "hydrogen_bond_donors_lipinski",
            "lipinski_rule_of_five_violations",
            "aromatic_rings_count",
            "number_of_minimal_rings",
            "molecular_weight",
            "exact_molecular_weight",
            "alogp",
            "topological_polar_surface_area",
            "formal_charge",
            "van_der_walls_volume",
            "qed_drug_likeliness",
            "np_likeness",
            "fractioncsp3",
        ] {
            let field = registry.resolve(&format!("properties.{}", name)).unwrap();
            assert_eq!(field.kind, ValueKind::Numeric, "{}", name);
            assert_eq!(field.location, FieldLocation::JoinedProperties);
            assert_eq!(field.required_join(), Some(JoinKind::Properties));
        }
    }

    #[test]
    fn test_numeric_base_fields() {
        let registry = FieldRegistry::global();
        for name in [
            "id",
            "organism_count",
            "geo_count",
            "citation_count",
            "collection_count",
            "synonym_count",
            "variants_count",
        ] {
            let field = registry.resolve(name).unwrap();
            assert_eq!(field.kind, ValueKind::Numeric, "{}", name);
            assert_eq!(field.required_join(), None);
        }
    }

    #[test]
    fn test_other_known_fields_are_text() {
        let registry = FieldRegistry::global();
        assert_eq!(registry.resolve("name").unwrap().kind, ValueKind::Text);
        assert_eq!(registry.resolve("annotation_level").unwrap().kind, ValueKind::Text);
        assert_eq!(
            registry.resolve("properties.np_classifier_class").unwrap().kind,
            ValueKind::Text
        );
    }

    #[test]
    fn test_pseudo_fields() {
        let registry = FieldRegistry::global();

        let organism = registry.resolve("organism").unwrap();
        assert_eq!(organism.target, FieldTarget::OrganismText);
        assert_eq!(organism.required_join(), Some(JoinKind::Organisms));

        let organism_id = registry.resolve("organism_id").unwrap();
        assert_eq!(organism_id.target, FieldTarget::OrganismKey);
        assert_eq!(organism_id.required_join(), Some(JoinKind::Organisms));
    }

    #[test]
    fn test_unresolved_fields() {
        let registry = FieldRegistry::global();
        assert!(registry.resolve("no_such_field").is_none());
        assert!(registry.resolve("properties.no_such_field").is_none());
        assert!(registry.resolve("molecular_weight").is_none());
        assert!(registry.resolve("name; DROP TABLE molecules").is_none());
    }

    #[test]
    fn test_property_column_prefix_optional() {
        let registry = FieldRegistry::global();
        assert_eq!(
            registry.property_column("alogp").map(|c| c.name),
            Some("alogp")
        );
        assert_eq!(
            registry.property_column("properties.alogp").map(|c| c.name),
            Some("alogp")
        );
        assert!(registry.property_column("name").is_none());
    }
}
