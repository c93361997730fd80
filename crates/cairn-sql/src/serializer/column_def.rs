use super::{Flavor, Formatter, Ident, Params, ToSql};

use crate::ColumnDef;

impl ToSql for &ColumnDef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = Ident(&self.name);

        if self.auto_increment {
            let ty = match f.serializer.flavor {
                // An INTEGER primary key aliases the rowid
                Flavor::Sqlite => "INTEGER",
                Flavor::Postgresql => "BIGSERIAL",
                Flavor::Mysql => "BIGINT NOT NULL AUTO_INCREMENT",
            };
            fmt!(f, name " " ty);
            return;
        }

        let not_null = (!self.nullable).then_some(" NOT NULL");
        fmt!(f, name " " self.ty not_null);

        if let Some(references) = &self.references {
            fmt!(
                f,
                " REFERENCES " Ident(&references.table) " (" Ident(&references.column) ")"
            );
        }
    }
}
