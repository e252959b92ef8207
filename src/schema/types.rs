use std::collections::HashSet;

/// Column data type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    /// ISO date (`YYYY-MM-DD`) stored as text
    Date,
    /// Time of day (`HH:MM:SS`) stored as text
    Time,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text | ColumnType::Date | ColumnType::Time => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    /// Override JSON field name (default: camelCase of name)
    pub json_field: Option<&'static str>,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            json_field: None,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            json_field: None,
        }
    }

    /// Set the JSON field name (for when it differs from camelCase of column name)
    pub const fn json(self, field: &'static str) -> Self {
        Self {
            json_field: Some(field),
            ..self
        }
    }

    /// Field name this column is read from in a fixture record
    pub fn json_key(&self) -> String {
        match self.json_field {
            Some(field) => field.to_string(),
            None => to_camel_case(self.name),
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(column: &'static str, references_table: &'static str) -> Self {
        Self {
            column,
            references_table,
            references_column: "id",
        }
    }
}

/// Index definition
#[derive(Debug, Clone)]
pub struct Index {
    pub columns: &'static [&'static str],
    pub unique: bool,
}

impl Index {
    /// Create a non-unique index
    pub const fn on(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            unique: false,
        }
    }

    /// Create a unique index
    pub const fn unique(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            unique: true,
        }
    }
}

/// How a fixture file is read and committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadPolicy {
    /// Read the whole file, sanitize the text, insert everything in one transaction
    WholeFile,
    /// Read the whole file, sanitize the text, commit every `batch_size` rows
    Batched { batch_size: usize },
    /// Stream records one by one from disk, commit every `batch_size` rows
    Streamed { batch_size: usize },
}

impl LoadPolicy {
    /// Rows per transaction, `None` meaning the whole file
    pub fn batch_size(&self) -> Option<usize> {
        match self {
            LoadPolicy::WholeFile => None,
            LoadPolicy::Batched { batch_size } | LoadPolicy::Streamed { batch_size } => {
                Some(*batch_size)
            }
        }
    }

    pub fn is_streamed(&self) -> bool {
        matches!(self, LoadPolicy::Streamed { .. })
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub source_file: &'static str,
    pub columns: &'static [Column],
    /// Primary key columns; a single `id` column for most tables
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
    /// Explicit index definitions
    pub indexes: &'static [Index],
    pub load_policy: LoadPolicy,
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .collect()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

/// Convert snake_case to camelCase
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("circuit_ref"), "circuitRef");
        assert_eq!(to_camel_case("position_text"), "positionText");
        assert_eq!(to_camel_case("name"), "name");
    }

    #[test]
    fn test_json_key_prefers_override() {
        let col = Column::required("id", ColumnType::Integer).json("circuitId");
        assert_eq!(col.json_key(), "circuitId");

        let col = Column::new("driver_ref", ColumnType::Text);
        assert_eq!(col.json_key(), "driverRef");
    }

    #[test]
    fn test_load_policy_batch_size() {
        assert_eq!(LoadPolicy::WholeFile.batch_size(), None);
        assert_eq!(LoadPolicy::Batched { batch_size: 5000 }.batch_size(), Some(5000));
        assert!(LoadPolicy::Streamed { batch_size: 10 }.is_streamed());
        assert!(!LoadPolicy::Batched { batch_size: 10 }.is_streamed());
    }
}
