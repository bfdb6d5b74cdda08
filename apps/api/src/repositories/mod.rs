//! Database repository layer
//!
//! Repositories own the SQL. Services depend on the [`RecordStore`] seam so
//! the pipeline can be exercised without a database.

pub mod scenery;

pub use scenery::{RecordStore, SceneryRepository};
