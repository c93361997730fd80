use crate::Result;

use cairn_core::{driver::Driver, err, Error};

use url::Url;

/// The driver for a connection URL.
pub(super) fn driver(url: &str) -> Result<Box<dyn Driver>> {
    let parsed = Url::parse(url).map_err(Error::driver)?;

    match parsed.scheme() {
        "sqlite" => connect_sqlite(url),
        scheme => Err(err!("unsupported database; scheme={scheme}; url={url}")),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(cairn_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(err!("`sqlite` feature not enabled"))
}
