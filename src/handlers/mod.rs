//! Request handlers.

pub mod rest;
