//! Static description of the relational catalog.
//!
//! Every table the service reads is listed here once, column by column,
//! with the storage type used to decode it and the value kind used when the
//! column appears in a filter. SQL text built anywhere in the crate takes
//! its identifiers from these tables and nowhere else.

/// How a column is cast and decoded when read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    Integer,
    Real,
    Text,
    Boolean,
}

impl StorageType {
    /// SQL type name used in `CAST(.. AS <type>)`
    pub fn cast_target(&self) -> &'static str {
        match self {
            StorageType::Integer | StorageType::Boolean => "INTEGER",
            StorageType::Real => "REAL",
            StorageType::Text => "TEXT",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageType::Integer | StorageType::Real)
    }
}

/// Comparison class of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Numeric,
    Text,
}

/// One column of a catalog table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub storage: StorageType,
    pub kind: ValueKind,
}

impl Column {
    /// Integer column compared numerically in filters
    const fn counted(name: &'static str) -> Self {
        Self {
            name,
            storage: StorageType::Integer,
            kind: ValueKind::Numeric,
        }
    }

    /// Real column compared numerically in filters
    const fn measured(name: &'static str) -> Self {
        Self {
            name,
            storage: StorageType::Real,
            kind: ValueKind::Numeric,
        }
    }

    /// Integer column that filters treat as text
    const fn integer(name: &'static str) -> Self {
        Self {
            name,
            storage: StorageType::Integer,
            kind: ValueKind::Text,
        }
    }

    const fn text(name: &'static str) -> Self {
        Self {
            name,
            storage: StorageType::Text,
            kind: ValueKind::Text,
        }
    }

    const fn flag(name: &'static str) -> Self {
        Self {
            name,
            storage: StorageType::Boolean,
            kind: ValueKind::Text,
        }
    }
}

/// A catalog table and its full column list
#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    /// Look up a column by its unqualified name
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterate over the column definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &'static Column> {
        self.columns.iter()
    }

    /// `table.column`
    pub fn qualified(&self, column: &Column) -> String {
        format!("{}.{}", self.name, column.name)
    }

    /// Select list casting every column to its storage type, aliased back to
    /// the bare column name.
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| {
                format!(
                    "CAST({}.{} AS {}) AS {}",
                    self.name,
                    c.name,
                    c.storage.cast_target(),
                    c.name
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Join tables for the many-to-many relations of a molecule
#[derive(Debug)]
pub struct Relation {
    /// Link table name
    pub link: &'static str,
    /// Column in the link table pointing at the molecule
    pub molecule_key: &'static str,
    /// Column in the link table pointing at the related record
    pub related_key: &'static str,
    /// Related entity table
    pub related: &'static Table,
}

pub static MOLECULES: Table = Table {
    name: "molecules",
    columns: &[
        Column::counted("id"),
        Column::text("standard_inchi"),
        Column::text("standard_inchi_key"),
        Column::text("canonical_smiles"),
        Column::text("sugar_free_smiles"),
        Column::text("identifier"),
        Column::text("name"),
        Column::text("cas"),
        Column::text("synonyms"),
        Column::text("iupac_name"),
        Column::text("murko_framework"),
        Column::text("structural_comments"),
        Column::integer("name_trust_level"),
        Column::integer("annotation_level"),
        Column::integer("parent_id"),
        Column::counted("variants_count"),
        Column::integer("ticker"),
        Column::text("status"),
        Column::flag("active"),
        Column::flag("has_variants"),
        Column::flag("has_stereo"),
        Column::flag("is_tautomer"),
        Column::flag("is_parent"),
        Column::flag("is_placeholder"),
        Column::text("comment"),
        Column::counted("organism_count"),
        Column::counted("geo_count"),
        Column::counted("citation_count"),
        Column::counted("collection_count"),
        Column::counted("synonym_count"),
        Column::flag("is_duplicate"),
        Column::flag("is_marine"),
    ],
};

pub static PROPERTIES: Table = Table {
    name: "properties",
    columns: &[
        Column::integer("id"),
        Column::integer("molecule_id"),
        Column::counted("total_atom_count"),
        Column::counted("heavy_atom_count"),
        Column::measured("molecular_weight"),
        Column::measured("exact_molecular_weight"),
        Column::text("molecular_formula"),
        Column::measured("alogp"),
        Column::measured("topological_polar_surface_area"),
        Column::counted("rotatable_bond_count"),
        Column::counted("hydrogen_bond_acceptors"),
        Column::counted("hydrogen_bond_donors"),
        Column::counted("hydrogen_bond_acceptors_lipinski"),
        Column::counted("hydrogen_bond_donors_lipinski"),
        Column::counted("lipinski_rule_of_five_violations"),
        Column::counted("aromatic_rings_count"),
        Column::measured("qed_drug_likeliness"),
        Column::counted("formal_charge"),
        Column::measured("fractioncsp3"),
        Column::counted("number_of_minimal_rings"),
        Column::measured("van_der_walls_volume"),
        Column::flag("contains_sugar"),
        Column::flag("contains_ring_sugars"),
        Column::flag("contains_linear_sugars"),
        Column::text("murcko_framework"),
        Column::measured("np_likeness"),
        Column::text("chemical_class"),
        Column::text("chemical_sub_class"),
        Column::text("chemical_super_class"),
        Column::text("direct_parent_classification"),
        Column::text("np_classifier_pathway"),
        Column::text("np_classifier_superclass"),
        Column::text("np_classifier_class"),
        Column::flag("np_classifier_is_glycoside"),
    ],
};

pub static ORGANISMS: Table = Table {
    name: "organisms",
    columns: &[
        Column::integer("id"),
        Column::text("name"),
        Column::text("iri"),
        Column::text("rank"),
        Column::integer("molecule_count"),
        Column::text("slug"),
        Column::integer("aphiaid_worms"),
        Column::text("name_aphia_worms"),
        Column::text("environment_aphia_worms"),
        Column::flag("is_marine"),
    ],
};

pub static GEO_LOCATIONS: Table = Table {
    name: "geo_locations",
    columns: &[Column::integer("id"), Column::text("name")],
};

pub static COLLECTIONS: Table = Table {
    name: "collections",
    columns: &[
        Column::integer("id"),
        Column::text("title"),
        Column::text("slug"),
        Column::text("description"),
        Column::text("comments"),
        Column::text("identifier"),
        Column::text("url"),
        Column::text("photo"),
        Column::flag("is_public"),
        Column::text("uuid"),
        Column::text("status"),
        Column::text("jobs_status"),
        Column::text("job_info"),
        Column::text("doi"),
        Column::integer("owner_id"),
        Column::integer("license_id"),
        Column::text("image"),
        Column::flag("promote"),
        Column::integer("sort_order"),
        Column::integer("successful_entries"),
        Column::integer("failed_entries"),
        Column::integer("molecules_count"),
        Column::integer("citations_count"),
        Column::integer("organisms_count"),
        Column::integer("geo_count"),
        Column::integer("total_entries"),
    ],
};

pub static CITATIONS: Table = Table {
    name: "citations",
    columns: &[
        Column::integer("id"),
        Column::text("doi"),
        Column::text("title"),
        Column::text("authors"),
        Column::text("citation_text"),
        Column::flag("active"),
    ],
};

pub static MOLECULE_ORGANISM: Relation = Relation {
    link: "molecule_organism",
    molecule_key: "molecule_id",
    related_key: "organism_id",
    related: &ORGANISMS,
};

pub static MOLECULE_GEO_LOCATION: Relation = Relation {
    link: "geo_location_molecule",
    molecule_key: "molecule_id",
    related_key: "geo_location_id",
    related: &GEO_LOCATIONS,
};

pub static MOLECULE_COLLECTION: Relation = Relation {
    link: "collection_molecule",
    molecule_key: "molecule_id",
    related_key: "collection_id",
    related: &COLLECTIONS,
};

/// A browsable catalog entity with list, lookup and molecule listings
#[derive(Debug)]
pub struct Entity {
    /// Key of the list in list responses
    pub plural: &'static str,
    pub table: &'static Table,
    /// Columns matched by the `query` list parameter
    pub search_columns: &'static [&'static str],
    /// Restrict lists to `is_marine` rows
    pub marine_only: bool,
    /// Link to the molecules of one entity
    pub molecules: Option<&'static Relation>,
    /// Restrict molecule listings to marine molecules
    pub marine_molecules_only: bool,
}

pub static ORGANISM_ENTITY: Entity = Entity {
    plural: "organisms",
    table: &ORGANISMS,
    search_columns: &["name"],
    marine_only: true,
    molecules: Some(&MOLECULE_ORGANISM),
    marine_molecules_only: true,
};

pub static COLLECTION_ENTITY: Entity = Entity {
    plural: "collections",
    table: &COLLECTIONS,
    search_columns: &["title"],
    marine_only: false,
    molecules: Some(&MOLECULE_COLLECTION),
    marine_molecules_only: false,
};

pub static CITATION_ENTITY: Entity = Entity {
    plural: "citations",
    table: &CITATIONS,
    search_columns: &["title", "authors", "doi"],
    marine_only: false,
    molecules: None,
    marine_molecules_only: false,
};

pub static LOCATION_ENTITY: Entity = Entity {
    plural: "locations",
    table: &GEO_LOCATIONS,
    search_columns: &["name"],
    marine_only: false,
    molecules: Some(&MOLECULE_GEO_LOCATION),
    marine_molecules_only: false,
};

/// Molecule columns searched inside per-entity molecule listings
pub const MOLECULE_SEARCH_COLUMNS: [&str; 3] = ["name", "canonical_smiles", "identifier"];

/// Properties columns reported by the range summary
pub const RANGE_COLUMNS: [&str; 9] = [
    "total_atom_count",
    "heavy_atom_count",
    "molecular_weight",
    "exact_molecular_weight",
    "alogp",
    "topological_polar_surface_area",
    "rotatable_bond_count",
    "hydrogen_bond_acceptors",
    "hydrogen_bond_donors",
];

/// Organism columns matched by the `organism` pseudo-field
pub const ORGANISM_MATCH_COLUMNS: [&str; 4] = ["name", "iri", "slug", "name_aphia_worms"];

/// Molecule columns searched by the free-text keyword
pub const KEYWORD_COLUMNS: [&str; 8] = [
    "name",
    "canonical_smiles",
    "identifier",
    "cas",
    "synonyms",
    "iupac_name",
    "standard_inchi",
    "standard_inchi_key",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lookup() {
        let mw = PROPERTIES.column("molecular_weight").unwrap();
        assert_eq!(mw.storage, StorageType::Real);
        assert_eq!(mw.kind, ValueKind::Numeric);

        let name_trust = MOLECULES.column("name_trust_level").unwrap();
        assert_eq!(name_trust.storage, StorageType::Integer);
        assert_eq!(name_trust.kind, ValueKind::Text);

        assert!(MOLECULES.column("drop table").is_none());
    }

    #[test]
    fn test_select_list_casts_every_column() {
        let list = GEO_LOCATIONS.select_list();
        assert_eq!(
            list,
            "CAST(geo_locations.id AS INTEGER) AS id, CAST(geo_locations.name AS TEXT) AS name"
        );
    }

    #[test]
    fn test_search_columns_exist() {
        for name in KEYWORD_COLUMNS {
            assert!(MOLECULES.column(name).is_some(), "missing {}", name);
        }
        for name in ORGANISM_MATCH_COLUMNS {
            assert!(ORGANISMS.column(name).is_some(), "missing {}", name);
        }
        for name in MOLECULE_SEARCH_COLUMNS {
            assert!(MOLECULES.column(name).is_some(), "missing {}", name);
        }
        for name in RANGE_COLUMNS {
            let column = PROPERTIES.column(name).unwrap();
            assert!(column.storage.is_numeric(), "{} is not numeric", name);
        }
    }

    #[test]
    fn test_entity_search_columns_exist() {
        for entity in [
            &ORGANISM_ENTITY,
            &COLLECTION_ENTITY,
            &CITATION_ENTITY,
            &LOCATION_ENTITY,
        ] {
            for name in entity.search_columns {
                assert!(
                    entity.table.column(name).is_some(),
                    "{} has no column {}",
                    entity.table.name,
                    name
                );
            }
            if entity.marine_only {
                assert!(entity.table.column("is_marine").is_some());
            }
        }
    }

    #[test]
    fn test_column_names_unique() {
        for table in [&MOLECULES, &PROPERTIES, &ORGANISMS, &COLLECTIONS, &CITATIONS] {
            let mut names: Vec<_> = table.iter().map(|c| c.name).collect();
            let before = names.len();
            names.sort();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate column in {}", table.name);
        }
    }
}
