use super::LinkMode;
use crate::{
    engine::{Include, Request},
    stmt::{IntoExpr, Path},
    Db, Result, Storable,
};

use cairn_core::{
    schema::{MemberKind, TableId},
    sql::Fragment,
    stmt::{self, Bindings, Value},
    Error,
};
use cairn_sql::{translate, Mode};

use std::marker::PhantomData;

/// State shared by every builder operating on the root entity type `M`.
///
/// Filters are combined with `AND` in the order they were added. Translation
/// and validation errors are recorded and reported, in call order, when the
/// builder runs.
pub struct Base<M> {
    db: Db,

    /// `None` when `M` is not registered; the error is recorded.
    table: Option<TableId>,

    filters: Vec<Fragment>,

    errors: Vec<Error>,

    /// Variables declared by parameterized filters, in declaration order
    vars: Vec<String>,

    bindings: Bindings,

    /// Selected members. `None` selects every member.
    fields: Option<Vec<String>>,

    include: Include,

    link_mode: LinkMode,

    _p: PhantomData<fn() -> M>,
}

impl<M: Storable> Base<M> {
    pub(crate) fn new(db: Db) -> Self {
        let mut errors = vec![];

        let table = match db.schema().table_for::<M>() {
            Ok(table) => Some(table.id),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        Self {
            link_mode: db.link_mode(),
            db,
            table,
            filters: vec![],
            errors,
            vars: vec![],
            bindings: Bindings::new(),
            fields: None,
            include: Include::default(),
            _p: PhantomData,
        }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn where_generic(&mut self, predicate: impl IntoExpr<bool>) {
        self.filter(predicate.into_expr().untyped, Mode::Inline);
    }

    pub fn where_generic_with_parameters(&mut self, predicate: impl IntoExpr<bool>) {
        for var in self.filter(predicate.into_expr().untyped, Mode::Parameterized) {
            if !self.vars.contains(&var) {
                self.vars.push(var);
            }
        }
    }

    /// Binds `values` to the declared variables in declaration order.
    ///
    /// # Panics
    ///
    /// Panics when the number of values differs from the number of declared
    /// variables.
    #[track_caller]
    pub fn prepare_generic<V>(&mut self, values: impl IntoIterator<Item = V>)
    where
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();

        assert_eq!(
            values.len(),
            self.vars.len(),
            "prepare_generic: {} value(s) given for the variables {:?}",
            values.len(),
            self.vars,
        );

        for (name, value) in self.vars.iter().zip(values) {
            self.bindings.insert(name.clone(), value);
        }
    }

    /// # Panics
    ///
    /// Panics when no parameterized filter declared `name`.
    #[track_caller]
    pub fn set_variable_generic(&mut self, name: &str, value: impl Into<Value>) {
        assert!(
            self.vars.iter().any(|var| var == name),
            "set_variable_generic: variable `{name}` is not declared; declared: {:?}",
            self.vars,
        );

        self.bindings.insert(name.to_string(), value.into());
    }

    /// Narrows the projection to `path`. The first call leaves every other
    /// member at its default value; the key is always read.
    pub fn field_generic<T>(&mut self, path: Path<M, T>) {
        let path = stmt::Path::from(path);

        let result = match &path.steps[..] {
            [name] => self.check_member(name, |kind| match kind {
                MemberKind::Collection { .. } => Some("collections are read with include"),
                _ => None,
            }),
            _ => Err(Error::invalid_statement(format!(
                "field selection takes a single member, got `{path}`"
            ))),
        };

        match result {
            Ok(()) => self
                .fields
                .get_or_insert_with(Vec::new)
                .extend(path.steps),
            Err(err) => self.errors.push(err),
        }
    }

    /// Loads the reference or collection at `path` (and the members it passes
    /// through) in the same call.
    pub fn include_generic<T>(&mut self, path: Path<M, T>) {
        let path = stmt::Path::from(path);

        match self.check_include(&path) {
            Ok(()) => self.include.insert(&path),
            Err(err) => self.errors.push(err),
        }
    }

    /// `true` materializes references that were not included as keys only,
    /// `false` loads them one level deep.
    pub fn short_link(&mut self, short: bool) {
        self.link_mode = if short { LinkMode::Short } else { LinkMode::Full };
    }

    /// The state handed to the engine.
    ///
    /// # Panics
    ///
    /// Panics when a declared variable has not been bound.
    #[track_caller]
    pub(crate) fn request(&self, limit: Option<u64>) -> Result<Request<'_>> {
        if !self.errors.is_empty() {
            return Err(Error::collect(self.errors.iter().cloned()));
        }

        for var in &self.vars {
            assert!(
                self.bindings.contains_key(var),
                "variable `{var}` is not bound; \
                 bind it with `set_variable_generic` or `prepare_generic`"
            );
        }

        Ok(Request {
            table: self.table()?,
            filters: &self.filters,
            bindings: &self.bindings,
            fields: self.fields.as_deref(),
            include: &self.include,
            link_mode: self.link_mode,
            limit,
        })
    }

    pub(crate) fn table(&self) -> Result<TableId> {
        self.table.ok_or_else(|| {
            Error::invalid_schema(format!(
                "`{}` is not registered",
                std::any::type_name::<M>()
            ))
        })
    }

    /// Adds a filter on the key of `M`.
    pub(crate) fn filter_key(&mut self, key: i64) {
        let Ok(table) = self.table() else { return };
        let schema = self.db.schema();
        let alias = cairn_core::sql::alias(0, 0);
        let fragment = Fragment::column_eq(Some(&alias), &schema.table(table).key, key);
        self.filters.push(fragment);
    }

    pub(crate) fn push_error(&mut self, err: Error) {
        self.errors.push(err);
    }

    /// Translates and records a filter, returning the variables it declares.
    fn filter(&mut self, expr: stmt::Expr, mode: Mode) -> Vec<String> {
        let Some(table) = self.table else {
            return vec![];
        };

        match translate(self.db.schema(), table, &expr, mode) {
            Ok(fragment) => {
                let vars = fragment.vars.clone();
                self.filters.push(fragment);
                vars
            }
            Err(err) => {
                self.errors.push(err);
                vec![]
            }
        }
    }

    fn check_member(
        &self,
        name: &str,
        reject: impl FnOnce(&MemberKind) -> Option<&'static str>,
    ) -> Result<()> {
        let table = self.table()?;
        let schema = self.db.schema();
        let info = schema.table(table);

        if info.key == name {
            return Ok(());
        }

        let Some((_, member)) = schema.member(table, name) else {
            return Err(Error::invalid_statement(format!(
                "`{}` has no member `{name}`",
                info.type_name
            )));
        };

        match reject(&member.kind) {
            Some(reason) => Err(Error::invalid_statement(format!(
                "cannot select member `{name}`: {reason}"
            ))),
            None => Ok(()),
        }
    }

    fn check_include(&self, path: &stmt::Path) -> Result<()> {
        let schema = self.db.schema();
        let mut table = self.table()?;

        for step in &path.steps {
            let info = schema.table(table);

            let Some((_, member)) = schema.member(table, step) else {
                return Err(Error::invalid_statement(format!(
                    "`{}` has no member `{step}`",
                    info.type_name
                )));
            };

            table = match &member.kind {
                MemberKind::Reference {
                    target,
                    by_id: false,
                    ..
                }
                | MemberKind::Collection { target, .. } => *target,
                MemberKind::Reference { .. } => {
                    return Err(Error::invalid_statement(format!(
                        "cannot include member `{step}`: it stores a key only"
                    )))
                }
                MemberKind::Column { .. } => {
                    return Err(Error::invalid_statement(format!(
                        "cannot include scalar member `{step}`"
                    )))
                }
            };
        }

        Ok(())
    }
}
