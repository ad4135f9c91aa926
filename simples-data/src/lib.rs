pub mod inputs;
pub mod tables;

pub use inputs::{InputLoadError, load_inputs, load_inputs_from_file, load_inputs_from_str};
pub use tables::{TableLoadError, TaxTablesLoader};
