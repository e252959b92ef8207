use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();
    let single_pk = match schema.primary_key {
        [only] => Some(*only),
        _ => None,
    };

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        let pk = if single_pk == Some(col.name) {
            " PRIMARY KEY"
        } else {
            ""
        };

        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql_type(),
            pk,
            null_constraint
        ));
    }

    if schema.primary_key.len() > 1 {
        columns.push(format!(
            "    PRIMARY KEY ({})",
            schema.primary_key.join(", ")
        ));
    }

    // Declared for documentation and indexing; enforcement stays off
    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns and explicit indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let fk_indexes = schema.foreign_keys.iter().map(|fk| {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
            schema.name, fk.column, schema.name, fk.column
        )
    });

    let explicit = schema.indexes.iter().map(|index| {
        format!(
            "CREATE {}INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
            if index.unique { "UNIQUE " } else { "" },
            schema.name,
            index.columns.join("_"),
            schema.name,
            index.columns.join(", ")
        )
    });

    fk_indexes.chain(explicit).collect()
}

/// Generate the parameterised INSERT statement for a table
pub fn generate_insert(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}
