#[derive(Debug)]
pub struct Capability {
    /// SQL dialect spoken by the database.
    pub flavor: Flavor,

    /// Longest identifier the database accepts. Longer junction table names
    /// are shortened to fit.
    pub max_identifier_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Capability {
    /// SQLite capabilities.
    ///
    /// SQLite itself has no practical identifier limit; it reports
    /// PostgreSQL's so the same schema stays portable.
    pub const SQLITE: Self = Self {
        flavor: Flavor::Sqlite,
        max_identifier_length: 63,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        flavor: Flavor::Postgresql,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        flavor: Flavor::Mysql,
        max_identifier_length: 64,
    };
}
