pub mod config;
pub mod error;
pub mod flags;
pub mod ingest;
pub mod parse;
pub mod wasm;
