// src/lib.rs

//! JMA seismic and tsunami bulletin watcher library

pub mod error;
pub mod models;
pub mod notify;
pub mod parser;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
