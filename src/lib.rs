pub mod batch;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod library;
pub mod lyrics;
pub mod people;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use engine::Engine;
pub use error::{QueryError, Result, RoleSearchError, SongbookError, SongbookExpectedError};

#[cfg(test)]
mod people_test;
