// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod json_schema;
pub mod model;
pub mod progress;
pub mod render;
pub mod resolve;
