// elx-aio/src/lib.rs
//! Asynchronous IO operations for elx (filesystem, archive extraction, process execution)

// Declare modules
pub mod extract;
pub mod fs;
pub mod process;

// Re-export the primary async functions
pub use extract::extract_zip_async;
pub use fs::{is_regular_file, list_directory_entries, remove_file_best_effort, remove_path_async};
pub use process::run_command_async;
