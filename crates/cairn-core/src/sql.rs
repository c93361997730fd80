//! Driver-independent SQL statements.
//!
//! Statements carry table and column names already resolved from the schema.
//! Rendering them for a particular database (quoting, placeholders, literal
//! escaping) is the job of the `cairn-sql` serializer.

mod create_table;
pub use create_table::{ColumnDef, CreateTable, ForeignKey};

mod delete;
pub use delete::Delete;

mod fragment;
pub use fragment::{Fragment, Param, Token};

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Column, Join, Returning, Select, TableRef};

mod update;
pub use update::Update;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    /// Number of columns in each returned row, if the statement returns rows.
    pub fn returning_len(&self) -> Option<usize> {
        match self {
            Statement::Select(select) => Some(select.returning.len()),
            _ => None,
        }
    }

    /// Names of every variable referenced by the statement's filters.
    pub fn vars(&self) -> Vec<&str> {
        let filter: &[Fragment] = match self {
            Statement::Select(stmt) => &stmt.filter[..],
            Statement::Update(stmt) => &stmt.filter[..],
            Statement::Delete(stmt) => &stmt.filter[..],
            _ => &[],
        };

        let mut vars = vec![];
        for name in filter.iter().flat_map(|fragment| fragment.vars.iter()) {
            if !vars.contains(&&name[..]) {
                vars.push(&name[..]);
            }
        }
        vars
    }
}

/// Table alias used for the `index`th table of a chain at subquery `depth`.
///
/// The outermost query aliases its tables `t0`, `t1`, ...; nested subqueries
/// use `s{depth}_{index}` so correlated names never collide.
pub fn alias(depth: usize, index: usize) -> String {
    if depth == 0 {
        format!("t{index}")
    } else {
        format!("s{depth}_{index}")
    }
}
