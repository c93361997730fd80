//! Builders accumulate intent for one operation on a root entity type and
//! dispatch it to the engine when run.
//!
//! Builders are mutated through `&mut self` and run through `&self`, so a
//! builder compiled once with named variables can be run again after new
//! values are bound.

mod base;
pub use base::Base;

mod create;
pub use create::CreateBuilder;

mod delete;
pub use delete::DeleteBuilder;

mod exist;
pub use exist::ExistBuilder;

mod query;
pub use query::QueryBuilder;

mod update;
pub use update::UpdateBuilder;

/// How references that were not included are materialized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// References hold only the related entity's key.
    #[default]
    Short,

    /// References are loaded one level deep, as if every reference member
    /// had been included.
    Full,
}

/// Filter methods shared by every builder that selects rows.
macro_rules! impl_filter_methods {
    ($builder:ident) => {
        impl<M: $crate::Storable> $builder<M> {
            /// Adds a predicate with constants inlined into the SQL text.
            pub fn where_generic(
                &mut self,
                predicate: impl $crate::stmt::IntoExpr<bool>,
            ) -> &mut Self {
                self.base.where_generic(predicate);
                self
            }

            /// Adds a predicate whose constants and variables become
            /// statement parameters.
            pub fn where_generic_with_parameters(
                &mut self,
                predicate: impl $crate::stmt::IntoExpr<bool>,
            ) -> &mut Self {
                self.base.where_generic_with_parameters(predicate);
                self
            }

            /// Binds values to the declared variables, in declaration order.
            #[track_caller]
            pub fn prepare_generic<V>(&mut self, values: impl IntoIterator<Item = V>) -> &mut Self
            where
                V: Into<cairn_core::stmt::Value>,
            {
                self.base.prepare_generic(values);
                self
            }

            /// Binds one declared variable.
            #[track_caller]
            pub fn set_variable_generic(
                &mut self,
                name: &str,
                value: impl Into<cairn_core::stmt::Value>,
            ) -> &mut Self {
                self.base.set_variable_generic(name, value);
                self
            }
        }
    };
}

pub(crate) use impl_filter_methods;
