//! Pure Rust async client for the [Source Engine Query protocol](https://developer.valvesoftware.com/wiki/Server_queries),
//! plus a batch front end that fans out over a configured server list and
//! renders one status row per server.
pub mod batch;
pub mod config;
pub mod cursor;
pub mod error;
pub mod info;
pub mod packet;
pub mod players;
pub mod query;
pub mod render;
