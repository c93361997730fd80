#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
pub use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column_def;
mod fragment;
mod statement;
mod ty;
mod value;

use crate::Statement;

use cairn_core::{driver::operation::Transaction, stmt::Bindings, Error, Result};

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// Values for named variables
    bindings: &'a Bindings,

    /// Problems found while serializing, reported once serialization ends
    errors: Vec<Error>,
}

impl Serializer {
    pub fn serialize(
        &self,
        stmt: &Statement,
        bindings: &Bindings,
        params: &mut impl Params,
    ) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            bindings,
            errors: vec![],
        };

        stmt.to_sql(&mut fmt);

        if !fmt.errors.is_empty() {
            return Err(Error::collect(fmt.errors));
        }

        ret.push(';');
        Ok(ret)
    }

    /// Serialize a transaction control operation to a SQL string.
    pub fn serialize_transaction(&self, op: &Transaction) -> &'static str {
        match (op, self.flavor) {
            (Transaction::Start, Flavor::Mysql) => "START TRANSACTION",
            (Transaction::Start, _) => "BEGIN",
            (Transaction::Commit, _) => "COMMIT",
            (Transaction::Rollback, _) => "ROLLBACK",
        }
    }
}
