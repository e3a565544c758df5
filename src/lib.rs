pub mod formats;
pub mod report;
pub mod shell;
pub mod test_case;
pub mod test_result;
pub mod test_runner;
pub mod text_diff;
pub mod utils;
