//! Core data types and I/O operations.

pub mod loaders;
pub mod transforms;
pub mod writers;

pub use loaders::{load_label_groups, LabelGroups, LoaderError, Point};
pub use transforms::{orient_strip, Orientation};
pub use writers::{output_file_name, write_index_list, WriteError};
