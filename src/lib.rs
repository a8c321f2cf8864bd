#![allow(non_snake_case)]

#[macro_use]
mod error;
pub mod config;
pub mod e621;
pub mod importer;

pub use crate::error::Error;
