//! SQL database abstraction trait.

/// Trait for SQL database backends.
///
/// This trait abstracts over different SQL databases (PostgreSQL, SQLite)
/// by providing the pool type and query rendering methods.
pub trait SqlDatabase: Send + Sync + 'static {
    /// The connection pool type for this database.
    type Pool: Clone + Send + Sync;

    /// Render a sea-query SELECT statement for this backend.
    fn build_select(stmt: sea_query::SelectStatement) -> String;

    /// Render a sea-query INSERT statement for this backend.
    fn build_insert(stmt: sea_query::InsertStatement) -> String;

    /// Render a sea-query UPDATE statement for this backend.
    fn build_update(stmt: sea_query::UpdateStatement) -> String;

    /// Render a sea-query DELETE statement for this backend.
    fn build_delete(stmt: sea_query::DeleteStatement) -> String;
}
