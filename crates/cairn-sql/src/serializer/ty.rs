use super::{Flavor, Formatter, Params, ToSql};

use cairn_core::stmt;

impl ToSql for stmt::Type {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let flavor = f.serializer.flavor;

        fmt!(
            f,
            match (self, flavor) {
                (stmt::Type::Bool, _) => "BOOLEAN",
                (stmt::Type::I64, Flavor::Sqlite) => "INTEGER",
                (stmt::Type::I64, _) => "BIGINT",
                (stmt::Type::F64, Flavor::Sqlite) => "REAL",
                (stmt::Type::F64, Flavor::Postgresql) => "DOUBLE PRECISION",
                (stmt::Type::F64, Flavor::Mysql) => "DOUBLE",
                (stmt::Type::String, _) => "TEXT",
            }
        );
    }
}
