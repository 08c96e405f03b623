//! Clinical note entity extraction, drug phrase grouping and interaction review.

pub mod api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactions;
pub mod logging;
pub mod nlp;

pub use error::NlpError;
