use sqlx::PgPool;

/// Runs store queries against the shared connection pool.
///
/// Each query is a plain struct with a `Processor` impl next to the entity
/// it reads or writes.
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
