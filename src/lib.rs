pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod model;
pub mod repo;
pub mod service;
pub mod util;

pub use extract::{extract, ExtractionResult};
