//! # CSV Export
//!
//! Molecule records flattened to one CSV row each. Columns are looked up on
//! the molecule first, then on its `properties` sub-record; nested arrays
//! are not exported.

use serde_json::Value;

use crate::executor::{plain_text, Record};

/// Exported columns, in output order
pub const CSV_HEADERS: [&str; 47] = [
    "identifier",
    "name",
    "cas",
    "iupac_name",
    "synonyms",
    "molecular_formula",
    "canonical_smiles",
    "sugar_free_smiles",
    "standard_inchi",
    "standard_inchi_key",
    "murcko_framework",
    "has_stereo",
    "molecular_weight",
    "exact_molecular_weight",
    "total_atom_count",
    "heavy_atom_count",
    "rotatable_bond_count",
    "hydrogen_bond_acceptors",
    "hydrogen_bond_donors",
    "topological_polar_surface_area",
    "alogp",
    "formal_charge",
    "van_der_walls_volume",
    "chemical_class",
    "chemical_sub_class",
    "chemical_super_class",
    "direct_parent_classification",
    "np_classifier_class",
    "np_classifier_superclass",
    "np_classifier_pathway",
    "lipinski_rule_of_five_violations",
    "hydrogen_bond_acceptors_lipinski",
    "hydrogen_bond_donors_lipinski",
    "qed_drug_likeliness",
    "np_likeness",
    "contains_sugar",
    "contains_linear_sugars",
    "contains_ring_sugars",
    "np_classifier_is_glycoside",
    "aromatic_rings_count",
    "number_of_minimal_rings",
    "fractioncsp3",
    "status",
    "is_marine",
    "citation_count",
    "organism_count",
    "geo_count",
];

/// Path recorded in the leading comment line
const SEARCH_PATH: &str = "/api/v1/molecules/search";

/// Value of one exported column; missing on both levels yields ""
pub fn cell(record: &Record, column: &str) -> String {
    if let Some(value) = record.get(column) {
        return plain_text(value);
    }
    record
        .get("properties")
        .and_then(Value::as_object)
        .and_then(|properties| properties.get(column))
        .map(plain_text)
        .unwrap_or_default()
}

/// Render `records` as CSV preceded by a comment naming the source query
pub fn write_csv(records: &[Record], source_query: &str) -> Result<Vec<u8>, csv::Error> {
    let preamble = if source_query.is_empty() {
        format!("# {}\n", SEARCH_PATH)
    } else {
        format!("# {}?{}\n", SEARCH_PATH, source_query)
    };

    let mut writer = csv::Writer::from_writer(preamble.into_bytes());
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(CSV_HEADERS.iter().map(|column| cell(record, column)))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
