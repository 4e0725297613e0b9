// src/lib.rs

//! stockwatch: product restock watcher library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
