use super::{value::Bind, value::Literal, Formatter, Ident, Params, ToSql};

use crate::{Column, Fragment, Param, Token};
use cairn_core::Error;

impl ToSql for &Fragment {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        for token in &self.tokens {
            token.to_sql(f);
        }
    }
}

impl ToSql for &Token {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Token::Sql(text) => fmt!(f, text),
            Token::Ident(name) => fmt!(f, Ident(name)),
            Token::Column { alias, name } => fmt!(f, ColumnRef(alias.as_deref(), name)),
            Token::Literal(value) => fmt!(f, Literal(value)),
            Token::Param(Param::Value(value)) => fmt!(f, Bind(value)),
            Token::Param(Param::Var(name)) => {
                let bindings = f.bindings;

                match bindings.get(name) {
                    Some(value) => fmt!(f, Bind(value)),
                    None => f.errors.push(Error::invalid_statement(format!(
                        "variable `{name}` is not bound"
                    ))),
                }
            }
        }
    }
}

/// A column, qualified by its table alias when it has one
pub(super) struct ColumnRef<'a>(pub(super) Option<&'a str>, pub(super) &'a str);

impl ToSql for ColumnRef<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(alias) = self.0 {
            fmt!(f, Ident(alias) ".");
        }
        fmt!(f, Ident(self.1));
    }
}

impl ToSql for &Column {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, ColumnRef(self.alias.as_deref(), &self.name));
    }
}
