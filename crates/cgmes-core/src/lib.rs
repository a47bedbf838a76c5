//! # cgmes-core: CGMES model primitives
//!
//! Data structures shared by the CGMES export pipeline.
//!
//! ## Core Data Structures
//!
//! - [`CgmesProfile`] - closed set of profiles with priority rank and short code
//! - [`ActiveProfiles`] - profiles selected for an export run
//! - [`SchemaTable`] / [`ClassSchema`] - declared class hierarchy and allowed profiles
//! - [`Registry`] / [`ModelObject`] / [`ObjectId`] - arena of model objects keyed by identifier
//! - [`Diagnostics`] - warnings collected while exporting
//!
//! ## Quick Start
//!
//! ```rust
//! use cgmes_core::*;
//!
//! let mut registry = Registry::new();
//! let bv = registry
//!     .insert("_BV1", ModelObject::new("BaseVoltage").with_mrid("_BV1").with("nominalVoltage", 110.0))
//!     .unwrap();
//! registry
//!     .insert(
//!         "_L1",
//!         ModelObject::new("ACLineSegment")
//!             .with_mrid("_L1")
//!             .with("r", 0.5)
//!             .with("BaseVoltage", bv),
//!     )
//!     .unwrap();
//!
//! let schema = SchemaTable::builtin(CGMES_V2_4_15).unwrap();
//! assert!(schema.get("ACLineSegment").is_some());
//! assert_eq!(registry.len(), 2);
//! ```

pub mod diagnostics;
pub mod error;
pub mod model;
pub mod profile;
pub mod schema;

pub use diagnostics::{DiagnosticIssue, Diagnostics};
pub use error::{CgmesError, CgmesResult};
pub use model::{ModelObject, ObjectId, Provenance, Registry, Value, MRID};
pub use profile::{ActiveProfiles, CgmesProfile};
pub use schema::{
    AttributeSchema, ClassSchema, PossibleProfileList, SchemaTable, CGMES_V2_4_15,
};
