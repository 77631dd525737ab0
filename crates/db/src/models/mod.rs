//! Entity structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! The wire format is camelCase JSON for both the admin app and the
//! mobile client.

pub mod carousel;
pub mod feature;
pub mod layout;
pub mod screen;
