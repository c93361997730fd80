use super::{Comma, Flavor, Formatter, Params, ToSql};

use cairn_core::{stmt, Error};

/// A value rendered inline as a SQL literal
pub(super) struct Literal<'a>(pub(super) &'a stmt::Value);

/// A value bound as a statement parameter
pub(super) struct Bind<'a>(pub(super) &'a stmt::Value);

impl ToSql for Literal<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Value::*;

        match self.0 {
            Null => fmt!(f, "NULL"),
            Bool(value) => match f.serializer.flavor {
                Flavor::Postgresql if *value => fmt!(f, "TRUE"),
                Flavor::Postgresql => fmt!(f, "FALSE"),
                _ if *value => fmt!(f, "1"),
                _ => fmt!(f, "0"),
            },
            I64(value) => f.dst.push_str(&value.to_string()),
            F64(value) if value.is_finite() => f.dst.push_str(&format!("{value:?}")),
            F64(value) => f.errors.push(Error::invalid_statement(format!(
                "cannot render non-finite float `{value}` as a SQL literal"
            ))),
            String(value) => {
                let backslash = matches!(f.serializer.flavor, Flavor::Mysql);

                f.dst.push('\'');
                for c in value.chars() {
                    if c == '\'' || (backslash && c == '\\') {
                        f.dst.push(c);
                    }
                    f.dst.push(c);
                }
                f.dst.push('\'');
            }
            List(items) => fmt!(f, "(" Comma(items.iter().map(Literal)) ")"),
            Record(_) => f.errors.push(Error::invalid_statement(format!(
                "cannot render `{}` as a SQL literal",
                self.0
            ))),
        }
    }
}

impl ToSql for Bind<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self.0 {
            stmt::Value::List(items) => fmt!(f, "(" Comma(items.iter().map(Bind)) ")"),
            stmt::Value::Record(_) => f.errors.push(Error::invalid_statement(format!(
                "cannot bind `{}` as a SQL parameter",
                self.0
            ))),
            value => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder)
            }
        }
    }
}
