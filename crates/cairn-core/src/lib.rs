pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError};

pub mod schema;
pub use schema::Schema;

pub mod sql;

pub mod stmt;

/// A Result type alias that uses Cairn's [`Error`] type.
///
/// `Ok` carries the success payload; `Err` carries the ordered error list
/// (see [`Error::errors`]). A value is never both.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
