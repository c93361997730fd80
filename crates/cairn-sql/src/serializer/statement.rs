use super::{value::Bind, Comma, Delimited, Flavor, Formatter, Ident, Params, ToSql};

use crate::{
    CreateTable, Delete, Fragment, Insert, Join, Returning, Select, Statement, TableRef, Update,
};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &CreateTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let columns = Comma(&self.columns);
        let primary_key = Comma(self.primary_key.iter().map(Ident));

        fmt!(
            f,
            "CREATE TABLE IF NOT EXISTS " Ident(&self.name)
            " (" columns ", PRIMARY KEY (" primary_key "))"
        );
    }
}

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        match &self.returning {
            Returning::Columns(columns) => fmt!(f, Comma(columns)),
            Returning::One => fmt!(f, "1"),
        }

        let from = &self.from;
        fmt!(f, " FROM " from);

        for join in &self.joins {
            fmt!(f, join);
        }

        fmt!(f, Filter(&self.filter));

        if let Some(order_by) = &self.order_by {
            fmt!(f, " ORDER BY " order_by);
        }

        if let Some(limit) = self.limit {
            fmt!(f, " LIMIT " limit);
        }
    }
}

impl ToSql for &TableRef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.name) " AS " Ident(&self.alias));
    }
}

impl ToSql for &Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let (table, lhs, rhs) = (&self.table, &self.lhs, &self.rhs);
        fmt!(f, " INNER JOIN " table " ON " lhs " = " rhs);
    }
}

impl ToSql for &Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "INSERT INTO " Ident(&self.table));

        if self.columns.is_empty() {
            match f.serializer.flavor {
                Flavor::Mysql => fmt!(f, " () VALUES ()"),
                _ => fmt!(f, " DEFAULT VALUES"),
            }
        } else {
            let columns = Comma(self.columns.iter().map(Ident));
            let values = Comma(self.values.iter().map(Bind));
            fmt!(f, " (" columns ") VALUES (" values ")");
        }

        // Other databases report the generated key out of band
        if let (Some(returning), Flavor::Postgresql) = (&self.returning, f.serializer.flavor) {
            fmt!(f, " RETURNING " Ident(returning));
        }
    }
}

impl ToSql for &Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assignment(column, value)),
        );

        fmt!(f, "UPDATE " Ident(&self.table) " SET " assignments Filter(&self.filter));
    }
}

impl ToSql for &Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " Ident(&self.table) Filter(&self.filter));
    }
}

/// `column = value` in an UPDATE
struct Assignment<'a>(&'a str, &'a cairn_core::stmt::Value);

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(self.0) " = " Bind(self.1));
    }
}

/// ` WHERE a AND b`; each condition is parenthesized when there are several.
struct Filter<'a>(&'a [Fragment]);

impl ToSql for Filter<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self.0 {
            [] => {}
            [only] => fmt!(f, " WHERE " only),
            conditions => {
                let conditions = Delimited(conditions.iter().map(Parens), " AND ");
                fmt!(f, " WHERE " conditions);
            }
        }
    }
}

struct Parens<'a>(&'a Fragment);

impl ToSql for Parens<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "(" self.0 ")");
    }
}
