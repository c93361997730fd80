pub mod ddl;

mod chain;
pub use chain::{column_for, from_chain};

pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

mod translate;
pub use translate::{translate, Mode};

pub use cairn_core::sql::*;
