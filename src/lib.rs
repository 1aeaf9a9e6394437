//! Carbon emission model
//!
//! Trains a tabular regression model that predicts an individual's yearly
//! carbon emissions from lifestyle survey answers, and scores single JSON
//! records against the persisted model. The `train` and `predict` binaries
//! are thin CLI wrappers over this crate.

// Modules
pub mod boosting;
pub mod data;
pub mod errors;
pub mod forest;
pub mod importance;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod preprocess;
pub mod schema;
pub mod serve;
pub mod trainer;
pub mod tree;

// Individual classes, and functions
pub use data::{Frame, Matrix};
pub use errors::CarbonError;
pub use pipeline::Pipeline;
