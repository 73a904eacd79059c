//! Kasir - point-of-sale backend
//!
//! Product catalog management, transactional checkout and sales reporting
//! over SQLite or PostgreSQL, exposed through a JSON REST API.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;
pub mod validation;
