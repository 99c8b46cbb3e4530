//! HTTP handler functions, one module per resource.

pub mod bosses;
