//! Domain types and policy for the Mast home-screen CMS.
//!
//! Everything here is persistence- and transport-agnostic: segment
//! policy, the component taxonomy with its typed config payloads,
//! reconciliation set arithmetic, and upload path normalization.

pub mod component;
pub mod error;
pub mod reconcile;
pub mod segment;
pub mod types;
pub mod upload;
