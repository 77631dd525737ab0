//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-row invariants
//! (batch reorders, the full layout save) run inside a single
//! transaction.

pub mod carousel_repo;
pub mod feature_repo;
pub mod layout_repo;
pub mod screen_repo;

pub use carousel_repo::CarouselRepo;
pub use feature_repo::FeatureRepo;
pub use layout_repo::LayoutRepo;
pub use screen_repo::ScreenRepo;
