pub mod file_loader;

pub use file_loader::{load_input_file, load_input_files};
