//! Catalog schema and field registry
//!
//! The catalog is a base `molecules` table with a 1:1 `properties`
//! sub-record and many-to-many links to organisms, geo locations and
//! collections. Citations are an independent entity.
//!
//! Nothing outside this module names a table or column directly: the
//! planner, executor and analytics engine all take identifiers from the
//! static [`Table`] definitions, and request field names are only ever
//! looked up through the [`FieldRegistry`].

mod registry;
mod schema;

pub use registry::{
    FieldDescriptor, FieldLocation, FieldRegistry, FieldTarget, JoinKind, ORGANISM_FIELD,
    ORGANISM_ID_FIELD, PROPERTIES_PREFIX,
};
pub use schema::{
    Column, Entity, Relation, StorageType, Table, ValueKind, CITATIONS, CITATION_ENTITY,
    COLLECTIONS, COLLECTION_ENTITY, GEO_LOCATIONS, KEYWORD_COLUMNS, LOCATION_ENTITY, MOLECULES,
    MOLECULE_COLLECTION, MOLECULE_GEO_LOCATION, MOLECULE_ORGANISM, MOLECULE_SEARCH_COLUMNS,
    ORGANISMS, ORGANISM_ENTITY, ORGANISM_MATCH_COLUMNS, PROPERTIES, RANGE_COLUMNS,
};
