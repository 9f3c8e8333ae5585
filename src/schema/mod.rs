//! Static relation declarations and the drop-then-create reset.

pub mod tables;

use log::{debug, info};
use std::fmt::Write;

use crate::store::Store;
use crate::{quote_ident, LoadResult};

pub use tables::{ALL_TABLES, DIET_CHARTS, DIET_CHART_MEALS, FOODS, PATIENTS, RECIPES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    VarChar(u16),
    Int,
    Integer,
    Real,
    Text,
    DateTime,
}

impl ColumnType {
    pub fn sql(&self) -> String {
        match self {
            ColumnType::VarChar(len) => format!("VARCHAR({})", len),
            ColumnType::Int => "INT".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Real => "REAL".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub not_null: bool,
    pub default: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            primary_key: false,
            autoincrement: false,
            not_null: false,
            default: None,
        }
    }

    /// Shorthand for the VARCHAR(255) columns most relations are made of.
    pub const fn varchar(name: &'static str) -> Self {
        Self::new(name, ColumnType::VarChar(255))
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn autoincrement(mut self) -> Self {
        self.primary_key = true;
        self.autoincrement = true;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub const fn default_expr(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    fn definition(&self) -> String {
        let mut def = format!("{} {}", quote_ident(self.name), self.ty.sql());
        if self.primary_key {
            def.push_str(" PRIMARY KEY");
        }
        if self.autoincrement {
            def.push_str(" AUTOINCREMENT");
        }
        if self.not_null {
            def.push_str(" NOT NULL");
        }
        if let Some(expr) = self.default {
            def.push_str(" DEFAULT ");
            def.push_str(expr);
        }
        def
    }
}

/// Declared, never enforced at insert time.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

#[derive(Debug)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// The column whose value identifies a row, if the relation declares one.
    pub fn identity(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_ident(self.name))
    }

    pub fn create_sql(&self) -> String {
        let mut lines: Vec<String> = self.columns.iter().map(Column::definition).collect();
        for fk in self.foreign_keys {
            lines.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                quote_ident(fk.column),
                quote_ident(fk.references_table),
                quote_ident(fk.references_column)
            ));
        }

        let mut sql = String::new();
        let _ = writeln!(sql, "CREATE TABLE {} (", quote_ident(self.name));
        let _ = writeln!(sql, "    {}", lines.join(",\n    "));
        sql.push(')');
        sql
    }
}

/// Drops every known relation and recreates the active ones empty.
#[derive(Debug, Clone, Default)]
pub struct SchemaInitializer {
    diet_chart_meals: bool,
}

impl SchemaInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diet_chart_meals(mut self, enabled: bool) -> Self {
        self.diet_chart_meals = enabled;
        self
    }

    /// Active relations in creation order; referenced relations come first.
    pub fn tables(&self) -> Vec<&'static TableSchema> {
        ALL_TABLES
            .iter()
            .copied()
            .filter(|t| self.diet_chart_meals || t.name != DIET_CHART_MEALS.name)
            .collect()
    }

    pub fn reset(&self, store: &Store) -> LoadResult<()> {
        let conn = store.lock();

        // DietChartMeals is dropped even when disabled so no stale copy survives
        for table in ALL_TABLES.iter().rev() {
            conn.execute_batch(&table.drop_sql())?;
            debug!("Dropped {} table", table.name);
        }

        for table in self.tables() {
            conn.execute_batch(&table.create_sql())?;
            info!("{} table created", table.name);
        }

        Ok(())
    }
}
