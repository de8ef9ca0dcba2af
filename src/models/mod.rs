//! Data models

pub mod sensor;

pub use sensor::*;
