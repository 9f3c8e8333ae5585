use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::etl::{ColumnMode, ConflictPolicy, TableLoader};
use crate::{EtlError, LoadResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub storage: StorageConfig,
    pub etl: LoaderConfig,
    pub schema: SchemaConfig,
    pub logging: LoggingConfig,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub source_dir: PathBuf,
    pub delimiter: char,
    pub trim: bool,
    pub batch_size: usize,
    pub on_conflict: ConflictPolicy,
    pub column_mode: ColumnMode,
    pub empty_as_null: bool,
    pub on_load_failure: OnLoadFailure,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    // Create the per-item DietChartMeals relation
    pub diet_chart_meals: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub file: PathBuf,
    pub relation: String,
}

/// What the refresh does with the remaining sources once one load fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnLoadFailure {
    #[default]
    Stop,
    Continue,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            etl: LoaderConfig::default(),
            schema: SchemaConfig::default(),
            logging: LoggingConfig::default(),
            sources: vec![
                SourceConfig::new("Patient_Profile_1000.csv", "Patients"),
                SourceConfig::new("Food_Database_10000.csv", "Foods"),
                SourceConfig::new("Recipe_Database_600.csv", "Recipes"),
                SourceConfig::new("Diet_Charts_Summary_2000.csv", "DietCharts"),
            ],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("database.sqlite"),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            delimiter: ',',
            trim: false,
            batch_size: 1000,
            on_conflict: ConflictPolicy::Ignore,
            column_mode: ColumnMode::Destination,
            empty_as_null: false,
            on_load_failure: OnLoadFailure::Stop,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

impl SourceConfig {
    pub fn new(file: impl Into<PathBuf>, relation: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            relation: relation.into(),
        }
    }
}

impl EtlConfig {
    pub fn load_from_file(path: &Path) -> LoadResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EtlError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EtlConfig = serde_yaml::from_str(&content)
            .map_err(|e| EtlError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> LoadResult<()> {
        let content = serde_yaml::to_string(self).map_err(|e| EtlError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| EtlError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn validate(&self) -> LoadResult<()> {
        if !self.etl.delimiter.is_ascii() {
            return Err(EtlError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.etl.delimiter
            )));
        }
        if self.etl.batch_size == 0 {
            return Err(EtlError::Config("batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Source path as read by the loader; relative paths sit under `source_dir`.
    pub fn resolve_source(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.etl.source_dir.join(file)
        }
    }

    pub fn to_loader(&self) -> TableLoader {
        TableLoader::new()
            .with_delimiter(self.etl.delimiter as u8)
            .with_trim(self.etl.trim)
            .with_batch_size(self.etl.batch_size)
            .with_conflict_policy(self.etl.on_conflict)
            .with_column_mode(self.etl.column_mode)
            .with_empty_as_null(self.etl.empty_as_null)
    }
}
