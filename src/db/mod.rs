pub mod connection;
pub mod migrations;
pub mod kv_repo;

pub use connection::*;
pub use kv_repo::{KeyValueStore, MemoryKv, SqliteKv};
