pub mod input_file;
pub mod loaders;
pub mod report;

pub use input_file::{partition_eligible, InputFile, ELIGIBLE_EXTENSION};
pub use loaders::{load_input_file, load_input_files};
pub use report::{render_preview, BackendResponse, GenerationState, Report};
