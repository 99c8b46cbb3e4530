//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row and `Deserialize` DTOs for writes.

pub mod boss;
