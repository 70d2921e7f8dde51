mod config_tests;
mod report_tests;
pub mod utils;
