//! Members that point at other entities.

mod many;
pub use many::Many;

mod reference;
pub use reference::Ref;
