use cairn_core::{
    schema::{TableId, TableMemberInfo},
    sql::{alias, Column, Join, TableRef},
    Schema,
};

/// The `FROM` table and ancestor joins for reading `table` at subquery
/// `depth`. Tables are aliased by their position in the chain.
pub fn from_chain(schema: &Schema, table: TableId, depth: usize) -> (TableRef, Vec<Join>) {
    let root = schema.table(table);
    let from = TableRef::new(&root.name, alias(depth, 0));

    let joins = root
        .ancestors
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let ancestor = schema.table(*id);
            let ancestor_alias = alias(depth, index + 1);
            Join {
                lhs: Column::new(Some(&ancestor_alias), &ancestor.key),
                rhs: Column::new(Some(&from.alias), &root.key),
                table: TableRef::new(&ancestor.name, ancestor_alias),
            }
        })
        .collect();

    (from, joins)
}

/// Resolves `member` on `table`'s chain to its qualified column.
pub fn column_for<'a>(
    schema: &'a Schema,
    table: TableId,
    depth: usize,
    member: &str,
) -> Option<(Column, &'a TableMemberInfo)> {
    schema
        .chain(table)
        .enumerate()
        .find_map(|(index, owner)| {
            let member = owner.member(member)?;
            let alias = alias(depth, index);
            let column = Column::new(Some(&alias), member.column().unwrap_or_default());
            Some((column, member))
        })
}
