mod query;
pub use query::Query;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Run a statement that returns rows
    Query(Query),

    /// Run a statement and report the number of affected rows
    Execute(Query),

    /// Insert a row and report the generated key
    Insert(Query),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// The statement carried by the operation, if any.
    pub fn query(&self) -> Option<&Query> {
        match self {
            Operation::Query(query) | Operation::Execute(query) | Operation::Insert(query) => {
                Some(query)
            }
            Operation::Transaction(_) => None,
        }
    }
}
