//! Table creation for a schema.

use crate::{ColumnDef, CreateTable, ForeignKey, Statement};

use cairn_core::{
    schema::{Junction, TableInfo},
    stmt::Type,
    Schema,
};

/// `CREATE TABLE` statements for every entity table followed by every
/// junction table.
pub fn schema_statements(schema: &Schema) -> Vec<Statement> {
    let tables = schema.tables.iter().map(|table| create_table(schema, table));

    let junctions = schema.junctions().map(|(owner, member, junction)| {
        let related = member
            .target()
            .map(|target| schema.table(target))
            .unwrap_or(owner);
        create_junction(owner, related, junction)
    });

    tables.chain(junctions).map(Statement::from).collect()
}

fn create_table(schema: &Schema, table: &TableInfo) -> CreateTable {
    let mut key = ColumnDef::new(&table.key, Type::I64);

    match table.parent() {
        // Child rows reuse the ancestor row's key
        Some(parent) => key.references = Some(references(schema.table(parent))),
        None => key.auto_increment = true,
    }

    let mut columns = vec![key];

    for member in &table.members {
        let (Some(column), Some(ty)) = (member.column(), member.ty()) else {
            continue;
        };

        let mut def = ColumnDef::new(column, ty);
        def.nullable = member.nullable;
        def.references = member
            .target()
            .map(|target| references(schema.table(target)));
        columns.push(def);
    }

    CreateTable {
        name: table.name.clone(),
        columns,
        primary_key: vec![table.key.clone()],
    }
}

fn create_junction(owner: &TableInfo, related: &TableInfo, junction: &Junction) -> CreateTable {
    let mut owner_column = ColumnDef::new(Junction::OWNER, Type::I64);
    owner_column.references = Some(references(owner));

    let mut related_column = ColumnDef::new(Junction::RELATED, Type::I64);
    related_column.references = Some(references(related));

    CreateTable {
        name: junction.name.clone(),
        columns: vec![owner_column, related_column],
        primary_key: vec![Junction::OWNER.to_string(), Junction::RELATED.to_string()],
    }
}

fn references(table: &TableInfo) -> ForeignKey {
    ForeignKey {
        table: table.name.clone(),
        column: table.key.clone(),
    }
}
