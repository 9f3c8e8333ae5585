// Common test utilities for integration tests
#![allow(dead_code)]

use diet_etl::config::{EtlConfig, SourceConfig};
use diet_etl::store::Store;
use std::path::PathBuf;
use tempfile::TempDir;

// Config rooted in a fresh temp directory, with its database inside it
pub fn create_test_config(temp_dir: &TempDir, sources: &[(&str, &str)]) -> EtlConfig {
    let mut config = EtlConfig::default();
    config.storage.database_path = temp_dir.path().join("database.sqlite");
    config.etl.source_dir = temp_dir.path().to_path_buf();
    config.sources = sources
        .iter()
        .map(|(file, relation)| SourceConfig::new(*file, *relation))
        .collect();
    config
}

// Helper function to create a test CSV file
pub fn create_test_csv(temp_dir: &TempDir, filename: &str, header: &str, rows: &[&str]) -> PathBuf {
    use std::fs::File;
    use std::io::Write;

    let csv_path = temp_dir.path().join(filename);
    let mut file = File::create(&csv_path).expect("Failed to create CSV file");

    writeln!(file, "{}", header).expect("Failed to write CSV header");
    for row in rows {
        writeln!(file, "{}", row).expect("Failed to write CSV data");
    }

    csv_path
}

// The four source files of a full run, small enough to check by hand
pub fn create_sample_sources(temp_dir: &TempDir) {
    create_test_csv(
        temp_dir,
        "Patient_Profile_1000.csv",
        "PatientID,Name_Pseudonym,Age,Gender,Dosha_Prakriti_Assessment",
        &["P001,Asha,34,F,Vata", "P002,Ravi,51,M,Pitta", "P003,Meena,27,F,Kapha"],
    );
    create_test_csv(
        temp_dir,
        "Food_Database_10000.csv",
        "FoodID,Food_Name_English,Category,Rasa",
        &["F1,Rice,Grain,Madhura", "F1,Rice2,Grain,Madhura", "F2,Dal,Legume,Kashaya"],
    );
    create_test_csv(
        temp_dir,
        "Recipe_Database_600.csv",
        "RecipeID,Recipe_Name,Ingredients,Dosha_Suitability",
        &["1,Khichdi,\"rice, moong dal, ghee\",Tridosha", "2,Kheer,\"rice, milk\",Pitta"],
    );
    create_test_csv(
        temp_dir,
        "Diet_Charts_Summary_2000.csv",
        "ChartID,PatientID,DateCreated,MealPlan,TotalDailyNutrition",
        &["10,P001,2024-01-05,Light breakfast,1800 kcal", "11,P002,2024-01-06,Warm meals,2100 kcal"],
    );
}

pub fn default_sources() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Patient_Profile_1000.csv", "Patients"),
        ("Food_Database_10000.csv", "Foods"),
        ("Recipe_Database_600.csv", "Recipes"),
        ("Diet_Charts_Summary_2000.csv", "DietCharts"),
    ]
}

// Every row of a relation, columns rendered as text, in rowid order
pub fn dump_relation(store: &Store, relation: &str) -> Vec<Vec<Option<String>>> {
    let conn = store.lock();
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM \"{}\" ORDER BY rowid", relation))
        .expect("Failed to prepare dump");
    let width = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| {
                    let value: rusqlite::types::Value = row.get(i)?;
                    Ok(match value {
                        rusqlite::types::Value::Null => None,
                        rusqlite::types::Value::Integer(n) => Some(n.to_string()),
                        rusqlite::types::Value::Real(r) => Some(r.to_string()),
                        rusqlite::types::Value::Text(s) => Some(s),
                        rusqlite::types::Value::Blob(b) => Some(format!("{:?}", b)),
                    })
                })
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .expect("Failed to query relation")
        .collect::<rusqlite::Result<Vec<_>>>()
        .expect("Failed to read rows");
    rows
}
