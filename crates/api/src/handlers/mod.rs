//! HTTP handler implementations, one module per route group.

pub mod carousel;
pub mod cms;
pub mod grid;
pub mod screens;
