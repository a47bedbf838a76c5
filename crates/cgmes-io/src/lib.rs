//! CGMES model I/O: JSON model snapshots in, profile-partitioned RDF/XML out.

pub mod export;
pub mod snapshot;

pub use export::{
    export_model, CgmesExporter, ExportOptions, ExportPlan, ExportReport, Namespaces,
    RenderedDocument,
};
pub use snapshot::{load_snapshot, parse_snapshot, ModelSnapshot};
