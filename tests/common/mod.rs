//! Shared SQLite fixture for integration tests
//!
//! Builds the catalog schema in an in-memory database from the static table
//! descriptions and seeds a small marine catalog:
//!
//! | id | molecule        | marine | organisms                   | properties |
//! |----|-----------------|--------|-----------------------------|------------|
//! | 1  | Manzamine A     | yes    | Haliclona, Halichondria     | yes        |
//! | 2  | Bryostatin 1    | yes    | Bugula neritina             | yes        |
//! | 3  | Halichondrin B  | yes    | Halichondria okadai         | yes        |
//! | 4  | Caffeine        | no     | Coffea arabica (non-marine) | yes        |
//! | 5  | Discodermolide  | yes    | Haliclona                   | no         |

#![allow(dead_code)]

use marinenp::catalog::{
    StorageType, Table, CITATIONS, COLLECTIONS, GEO_LOCATIONS, MOLECULES, ORGANISMS, PROPERTIES,
};
use marinenp::executor::SqliteExecutor;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub const MARINE_MOLECULES: u64 = 4;
pub const MARINE_ORGANISMS: u64 = 3;

fn create_table(table: &Table) -> String {
    let columns = table
        .iter()
        .map(|c| {
            if c.name == "id" {
                return "id INTEGER PRIMARY KEY".to_string();
            }
            let ty = match c.storage {
                StorageType::Integer | StorageType::Boolean => "INTEGER",
                StorageType::Real => "REAL",
                StorageType::Text => "TEXT",
            };
            format!("{} {}", c.name, ty)
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", table.name, columns)
}

const LINK_TABLES: [&str; 3] = [
    "CREATE TABLE molecule_organism (molecule_id INTEGER NOT NULL, organism_id INTEGER NOT NULL)",
    "CREATE TABLE geo_location_molecule (geo_location_id INTEGER NOT NULL, molecule_id INTEGER NOT NULL)",
    "CREATE TABLE collection_molecule (collection_id INTEGER NOT NULL, molecule_id INTEGER NOT NULL)",
];

const SEED: &[&str] = &[
    "INSERT INTO molecules (id, identifier, name, canonical_smiles, cas, synonyms, status, is_marine, organism_count, geo_count, citation_count) VALUES
        (1, 'CNP0000001', 'Manzamine A', 'OC12CCCCC=CC1N1CCC(C=C)C2', '104196-68-1', 'Keramamine A', 'APPROVED', 1, 2, 1, 1),
        (2, 'CNP0000002', 'Bryostatin 1', 'CCCC=CC=CC(=O)OC1CC', '83314-01-6', NULL, 'APPROVED', 1, 1, 1, 0),
        (3, 'CNP0000003', 'Halichondrin B', 'CC1CC2OC3CC4OC', '103614-76-2', NULL, 'APPROVED', 1, 1, 0, 0),
        (4, 'CNP0000004', 'Caffeine', 'CN1C=NC2=C1C(=O)N(C(=O)N2C)C', '58-08-2', 'Guaranine', 'APPROVED', 0, 1, 0, 0),
        (5, 'CNP0000005', 'Discodermolide', 'CC(C=CC=C)C(OC(N)=O)C', '127943-53-7', NULL, 'DRAFT', 1, 1, 0, 0)",
    "INSERT INTO properties (id, molecule_id, molecular_weight, alogp, heavy_atom_count, total_atom_count, molecular_formula, chemical_super_class, chemical_class, chemical_sub_class, np_classifier_pathway, np_classifier_superclass, np_classifier_class, contains_sugar) VALUES
        (11, 1, 548.8, 6.2, 41, 90, 'C36H44N4O', 'Alkaloids', 'Indoles', 'Beta-carbolines', 'Alkaloids', 'Tryptophan alkaloids', 'Manzamine alkaloids', 0),
        (12, 2, 905.0, 3.1, 64, 140, 'C47H68O17', 'Lipids and lipid-like molecules', 'Macrolides', NULL, 'Polyketides', 'Macrolides', 'Bryostatins', 0),
        (13, 3, 1111.3, 2.5, 70, 170, 'C60H86O19', 'Lipids and lipid-like molecules', 'Macrolides', 'Polyether', 'Polyketides', 'Polyethers', 'Halichondrins', 1),
        (14, 4, 194.19, -0.1, 14, 24, 'C8H10N4O2', 'Organoheterocyclic compounds', 'Imidazopyrimidines', 'Purines', 'Alkaloids', 'Pseudoalkaloids', 'Purine alkaloids', 0)",
    "INSERT INTO organisms (id, name, iri, slug, aphiaid_worms, name_aphia_worms, is_marine) VALUES
        (1, 'Haliclona sp.', 'http://www.wikidata.org/entity/Q1583476', 'haliclona-sp', 131795, 'Haliclona', 1),
        (2, 'Bugula neritina', 'http://www.wikidata.org/entity/Q2926393', 'bugula-neritina', 111355, 'Bugula neritina', 1),
        (3, 'Coffea arabica', 'http://www.wikidata.org/entity/Q17223', 'coffea-arabica', NULL, NULL, 0),
        (4, 'Halichondria okadai', 'http://www.wikidata.org/entity/Q5642417', 'halichondria-okadai', 134224, 'Halichondria okadai', 1)",
    "INSERT INTO molecule_organism (molecule_id, organism_id) VALUES (1, 1), (1, 4), (2, 2), (3, 4), (4, 3), (5, 1)",
    "INSERT INTO geo_locations (id, name) VALUES (1, 'Okinawa'), (2, 'Gulf of Mexico')",
    "INSERT INTO geo_location_molecule (geo_location_id, molecule_id) VALUES (1, 1), (2, 2)",
    "INSERT INTO collections (id, title, slug, description, is_public) VALUES
        (1, 'Marine Sponges', 'marine-sponges', 'Sponge-derived compounds', 1),
        (2, 'Bryozoans', 'bryozoans', NULL, 1)",
    "INSERT INTO collection_molecule (collection_id, molecule_id) VALUES (1, 1), (1, 3), (1, 5), (2, 2)",
    "INSERT INTO citations (id, doi, title, authors, active) VALUES
        (1, '10.1021/ja00268a061', 'Manzamine A, a novel antitumor alkaloid from a sponge', 'Sakai R; Higa T', 1),
        (2, '10.1021/jo00387a052', 'Isolation and structure of bryostatin 1', 'Pettit GR', 1)",
];

/// Empty schema in a single-connection in-memory pool
pub async fn empty_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    for table in [
        &MOLECULES,
        &PROPERTIES,
        &ORGANISMS,
        &GEO_LOCATIONS,
        &COLLECTIONS,
        &CITATIONS,
    ] {
        sqlx::query(&create_table(table))
            .execute(&pool)
            .await
            .unwrap();
    }
    for ddl in LINK_TABLES {
        sqlx::query(ddl).execute(&pool).await.unwrap();
    }
    pool
}

pub async fn seeded_pool() -> SqlitePool {
    let pool = empty_pool().await;
    for statement in SEED {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool
}

pub async fn seeded_executor() -> SqliteExecutor {
    SqliteExecutor::new(seeded_pool().await)
}
