//! # Route Modules

pub mod validate;
