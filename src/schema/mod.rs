pub mod csvw;
pub mod types;
pub mod write;

pub use csvw::create;
pub use types::{ColumnSpec, ComponentKind, OBSERVATION_SCHEMA};
pub use write::{write_codelists_metadata, write_columns, write_components};
