use crate::{column_for, from_chain, Column, Fragment, Param, Token};

use cairn_core::{
    schema::{MemberKind, TableId, TableMemberInfo},
    sql::alias,
    stmt::{BinaryOp, Expr, ExprBinaryOp, ExprFunc, ExprInList, Path, Type, Value},
    Error, Result, Schema,
};

/// How constants in a predicate reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Constants are written into the SQL text as escaped literals.
    /// Variables are rejected.
    Inline,

    /// Constants and variables become statement parameters. Variable values
    /// are looked up when the statement is serialized, so the fragment can be
    /// executed again with different bindings.
    Parameterized,
}

/// Translates a predicate over the entity stored in `root` into a SQL
/// condition.
///
/// Columns of `root` and its ancestors are qualified with the aliases of a
/// depth-0 [`from_chain`]. Member chains through references become
/// `IN (SELECT ...)` sub-filters on the referenced table.
pub fn translate(schema: &Schema, root: TableId, expr: &Expr, mode: Mode) -> Result<Fragment> {
    Translate { schema, root, mode }.predicate(expr)
}

struct Translate<'a> {
    schema: &'a Schema,
    root: TableId,
    mode: Mode,
}

/// Right-hand side of a comparison
enum Operand {
    Value(Value),
    Var(String),
}

/// What a path step resolved to
#[derive(Clone, Copy)]
enum Resolved<'a> {
    /// The table's key column, which is not a declared member
    Key(&'a str),
    Member(&'a TableMemberInfo),
}

impl Translate<'_> {
    fn predicate(&self, expr: &Expr) -> Result<Fragment> {
        match expr {
            Expr::And(e) => self.junction(&e.operands, " AND ", Fragment::always()),
            Expr::Or(e) => self.junction(&e.operands, " OR ", Fragment::never()),
            Expr::Not(e) => {
                let mut fragment = Fragment::sql("NOT (");
                fragment.append(self.predicate(&e.expr)?);
                fragment.push_sql(")");
                Ok(fragment)
            }
            Expr::BinaryOp(e) => self.binary_op(expr, e),
            Expr::IsNull(e) => {
                let Expr::Path(path) = &*e.expr else {
                    return Err(Error::translation("null checks apply to members only", expr));
                };

                self.with_path(expr, path, |column, _| {
                    let mut fragment = column_fragment(&column);
                    fragment.push_sql(if e.negate { " IS NOT NULL" } else { " IS NULL" });
                    Ok(fragment)
                })
            }
            Expr::InList(e) => self.in_list(expr, e),
            Expr::Func(e) => self.func(expr, e),
            Expr::Path(path) => self.with_path(expr, path, |column, member| {
                if member.ty() != Some(Type::Bool) {
                    return Err(Error::translation(
                        format!("member `{}` is not a boolean", member.name()),
                        expr,
                    ));
                }

                Ok(self.compare(&column, BinaryOp::Eq, Operand::Value(Value::Bool(true))))
            }),
            Expr::Value(Value::Bool(true)) => Ok(Fragment::always()),
            Expr::Value(Value::Bool(false)) => Ok(Fragment::never()),
            Expr::Value(_) | Expr::Var(_) => {
                Err(Error::translation("expression is not a predicate", expr))
            }
        }
    }

    fn junction(&self, operands: &[Expr], sep: &str, empty: Fragment) -> Result<Fragment> {
        if operands.is_empty() {
            return Ok(empty);
        }

        let mut fragment = Fragment::new();

        for (i, operand) in operands.iter().enumerate() {
            if i > 0 {
                fragment.push_sql(sep);
            }

            let inner = self.predicate(operand)?;

            if matches!(operand, Expr::And(_) | Expr::Or(_)) {
                fragment.push_sql("(");
                fragment.append(inner);
                fragment.push_sql(")");
            } else {
                fragment.append(inner);
            }
        }

        Ok(fragment)
    }

    fn binary_op(&self, expr: &Expr, e: &ExprBinaryOp) -> Result<Fragment> {
        let (path, op, other) = match (&*e.lhs, &*e.rhs) {
            (Expr::Path(path), rhs) => (path, e.op, rhs),
            (lhs, Expr::Path(path)) => (path, e.op.commute(), lhs),
            _ => {
                return Err(Error::translation(
                    "comparison does not reference a member",
                    expr,
                ))
            }
        };

        // Member against member. The right side is resolved on the root
        // table, so inside a sub-filter it becomes a correlated reference.
        if let Expr::Path(other) = other {
            let (rhs, _) = match &other.steps[..] {
                [step] => self.resolve(expr, self.root, 0, step)?,
                _ => {
                    return Err(Error::translation(
                        "member chains can only be compared with constants",
                        expr,
                    ))
                }
            };

            return self.with_path(expr, path, |lhs, _| {
                let mut fragment = column_fragment(&lhs);
                fragment.push_sql(format!(" {} ", sql_op(op)));
                fragment.push_column(rhs.alias.as_deref(), &rhs.name);
                Ok(fragment)
            });
        }

        let operand = self.operand(expr, other)?;

        if let Operand::Value(Value::Null) = operand {
            let negate = match op {
                BinaryOp::Eq => false,
                BinaryOp::Ne => true,
                _ => {
                    return Err(Error::translation(
                        format!("cannot compare with `{op}` against null"),
                        expr,
                    ))
                }
            };

            return self.with_path(expr, path, |column, _| {
                let mut fragment = column_fragment(&column);
                fragment.push_sql(if negate { " IS NOT NULL" } else { " IS NULL" });
                Ok(fragment)
            });
        }

        self.with_path(expr, path, |column, member| {
            self.check_operand(expr, member, &operand)?;
            Ok(self.compare(&column, op, operand))
        })
    }

    fn in_list(&self, expr: &Expr, e: &ExprInList) -> Result<Fragment> {
        let Expr::Path(path) = &*e.expr else {
            return Err(Error::translation("`in` applies to members only", expr));
        };

        let operands = e
            .list
            .iter()
            .map(|item| self.operand(expr, item))
            .collect::<Result<Vec<_>>>()?;

        self.with_path(expr, path, |column, member| {
            if operands.is_empty() {
                return Ok(Fragment::never());
            }

            let mut fragment = column_fragment(&column);
            fragment.push_sql(" IN (");
            for (i, operand) in operands.into_iter().enumerate() {
                if i > 0 {
                    fragment.push_sql(", ");
                }
                self.check_operand(expr, member, &operand)?;
                self.push_operand(&mut fragment, operand);
            }
            fragment.push_sql(")");
            Ok(fragment)
        })
    }

    fn func(&self, expr: &Expr, e: &ExprFunc) -> Result<Fragment> {
        let (prefix, suffix) = match &e.name[..] {
            "starts_with" => ("", "%"),
            "contains" => ("%", "%"),
            name => {
                return Err(Error::translation(
                    format!("unsupported function `{name}`"),
                    expr,
                ))
            }
        };

        let [Expr::Path(path), Expr::Value(Value::String(needle))] = &e.args[..] else {
            return Err(Error::translation(
                format!("`{}` needs a member and a constant string", e.name),
                expr,
            ));
        };

        let pattern = format!("{prefix}{}{suffix}", escape_like(needle));

        self.with_path(expr, path, |column, member| {
            if member.ty() != Some(Type::String) {
                return Err(Error::translation(
                    format!("member `{}` is not a string", member.name()),
                    expr,
                ));
            }

            let mut fragment = column_fragment(&column);
            fragment.push_sql(" LIKE ");
            self.push_operand(&mut fragment, Operand::Value(Value::String(pattern)));
            fragment.push_sql(" ESCAPE ");
            fragment.push(Token::Literal(Value::from("\\")));
            Ok(fragment)
        })
    }

    /// Resolves `path` from the root and builds the condition on its final
    /// member with `leaf`, wrapping it in one sub-filter per reference hop.
    fn with_path(
        &self,
        expr: &Expr,
        path: &Path,
        leaf: impl FnOnce(Column, Resolved<'_>) -> Result<Fragment>,
    ) -> Result<Fragment> {
        let Some((last, init)) = path.steps.split_last() else {
            return Err(Error::translation("empty member path", expr));
        };

        let mut table = self.root;
        let mut depth = 0;
        let mut hops = vec![];

        for step in init {
            let (column, resolved) = self.resolve(expr, table, depth, step)?;

            match resolved {
                Resolved::Member(TableMemberInfo {
                    kind: MemberKind::Reference { target, .. },
                    ..
                }) => {
                    depth += 1;
                    hops.push((column, *target, depth));
                    table = *target;
                }
                Resolved::Member(member) if member.is_collection() => {
                    return Err(collection_error(expr, step))
                }
                _ => {
                    return Err(Error::translation(
                        format!("member `{step}` is not a reference"),
                        expr,
                    ))
                }
            }
        }

        let (column, resolved) = self.resolve(expr, table, depth, last)?;

        if let Resolved::Member(member) = resolved {
            if member.is_collection() {
                return Err(collection_error(expr, last));
            }
        }

        let mut fragment = leaf(column, resolved)?;

        for (column, target, depth) in hops.into_iter().rev() {
            fragment = self.sub_filter(&column, target, depth, fragment);
        }

        Ok(fragment)
    }

    /// `column IN (SELECT key FROM target WHERE inner)`
    fn sub_filter(
        &self,
        column: &Column,
        target: TableId,
        depth: usize,
        inner: Fragment,
    ) -> Fragment {
        let (from, joins) = from_chain(self.schema, target, depth);
        let key = &self.schema.table(target).key;

        let mut fragment = column_fragment(column);
        fragment.push_sql(" IN (SELECT ");
        fragment.push_column(Some(&from.alias), key);
        fragment.push_sql(" FROM ");
        fragment.push_ident(&from.name);
        fragment.push_sql(" AS ");
        fragment.push_ident(&from.alias);

        for join in joins {
            fragment.push_sql(" INNER JOIN ");
            fragment.push_ident(&join.table.name);
            fragment.push_sql(" AS ");
            fragment.push_ident(&join.table.alias);
            fragment.push_sql(" ON ");
            fragment.push_column(join.lhs.alias.as_deref(), &join.lhs.name);
            fragment.push_sql(" = ");
            fragment.push_column(join.rhs.alias.as_deref(), &join.rhs.name);
        }

        fragment.push_sql(" WHERE ");
        fragment.append(inner);
        fragment.push_sql(")");
        fragment
    }

    fn resolve(
        &self,
        expr: &Expr,
        table: TableId,
        depth: usize,
        name: &str,
    ) -> Result<(Column, Resolved<'_>)> {
        if let Some((column, member)) = column_for(self.schema, table, depth, name) {
            return Ok((column, Resolved::Member(member)));
        }

        let table = self.schema.table(table);

        if table.key == name {
            let column = Column::new(Some(&alias(depth, 0)), &table.key);
            return Ok((column, Resolved::Key(&table.key)));
        }

        Err(Error::translation(
            format!("`{}` has no member `{name}`", table.type_name),
            expr,
        ))
    }

    fn operand(&self, expr: &Expr, operand: &Expr) -> Result<Operand> {
        match operand {
            Expr::Value(Value::Record(_) | Value::List(_)) => Err(Error::translation(
                "only scalar constants can be compared",
                expr,
            )),
            Expr::Value(value) => Ok(Operand::Value(value.clone())),
            Expr::Var(_) if self.mode == Mode::Inline => Err(Error::translation(
                "variables need a parameterized filter",
                expr,
            )),
            Expr::Var(var) => Ok(Operand::Var(var.name.clone())),
            _ => Err(Error::translation(
                "comparison operand must be a constant or a variable",
                expr,
            )),
        }
    }

    /// Constants must fit the member's column type.
    fn check_operand(&self, expr: &Expr, member: Resolved<'_>, operand: &Operand) -> Result<()> {
        if let (Operand::Value(value), Some(ty)) = (operand, member.ty()) {
            if !value.is_a(ty) {
                return Err(Error::translation(
                    format!(
                        "member `{}` is {ty} but was compared with {}",
                        member.name(),
                        value.variant_name()
                    ),
                    expr,
                ));
            }
        }
        Ok(())
    }

    fn compare(&self, column: &Column, op: BinaryOp, operand: Operand) -> Fragment {
        let mut fragment = column_fragment(column);
        fragment.push_sql(format!(" {} ", sql_op(op)));
        self.push_operand(&mut fragment, operand);
        fragment
    }

    fn push_operand(&self, fragment: &mut Fragment, operand: Operand) {
        match (operand, self.mode) {
            (Operand::Value(value), Mode::Inline) => fragment.push(Token::Literal(value)),
            (Operand::Value(value), Mode::Parameterized) => {
                fragment.push(Token::Param(Param::Value(value)))
            }
            (Operand::Var(name), _) => fragment.push(Token::Param(Param::Var(name))),
        }
    }
}

impl Resolved<'_> {
    fn name(&self) -> &str {
        match self {
            Resolved::Key(name) => name,
            Resolved::Member(member) => &member.name,
        }
    }

    fn ty(&self) -> Option<Type> {
        match self {
            Resolved::Key(_) => Some(Type::I64),
            Resolved::Member(member) => member.ty(),
        }
    }
}

fn column_fragment(column: &Column) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.push_column(column.alias.as_deref(), &column.name);
    fragment
}

fn collection_error(expr: &Expr, member: &str) -> Error {
    Error::translation(
        format!("collection member `{member}` cannot be used in a filter"),
        expr,
    )
}

fn sql_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Eq => "=",
        BinaryOp::Ne => "<>",
        BinaryOp::Ge => ">=",
        BinaryOp::Gt => ">",
        BinaryOp::Le => "<=",
        BinaryOp::Lt => "<",
    }
}

/// Escapes `LIKE` wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
