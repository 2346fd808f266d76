//! `markrecon-recon`: orientation-aware mark sheet reconciliation engine.
//!
//! Pure engine crate: receives raw cell grids, returns classified results.
//! No CLI or IO dependencies.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod matrix;
pub mod model;
pub mod normalize;
pub mod orientation;
pub mod summary;

pub use config::{DetectionConfig, OrientationChoice, ReconConfig, ReportConfig};
pub use engine::{compare, reconcile, reconcile_with};
pub use error::ReconError;
pub use frame::to_frame;
pub use matrix::build_matrix;
pub use model::{
    CellValue, ComparisonRow, Frame, Matrix, Orientation, RawTable, ReconResult, Reconciliation,
    SourceProfile, Status, Summary,
};
pub use normalize::{looks_like_identifier, normalize, normalize_cell};
pub use orientation::{detect_orientation, detect_orientation_with, explain_orientation};
