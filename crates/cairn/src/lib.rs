mod builder;
pub use builder::{
    Base, CreateBuilder, DeleteBuilder, ExistBuilder, LinkMode, QueryBuilder, UpdateBuilder,
};

pub mod db;
pub use db::Db;

mod engine;

pub mod relation;
pub use relation::{Many, Ref};

mod storable;
pub use storable::Storable;

pub mod stmt;
pub use stmt::{var, Field, RecordExt};

pub use cairn_core::{
    driver,
    schema::{self, Describe, Descriptor},
    Error, Result,
};
