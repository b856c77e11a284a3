/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `schema`: idempotent creation of the `users` table
///
/// The `UserStore` implementation on top of this lives in `store::postgres`.

pub mod pool;
pub mod schema;
