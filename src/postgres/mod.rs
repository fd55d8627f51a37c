// ABOUTME: PostgreSQL connection setup and dump adapter
// ABOUTME: Exports the connection helpers, text-cell handle and dialect implementation

pub mod connection;
pub mod dialect;
pub mod handle;

pub use connection::connect;
pub use handle::PostgresHandle;
