//! Domain layer shared across the seekr workspace.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the resolution facade, and the API without cycles.

pub mod bulk;
pub mod error;
pub mod types;
pub mod vault;
