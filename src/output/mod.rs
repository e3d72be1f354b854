pub mod report;
pub mod response;

pub use report::{print_rules, TextReporter};
pub use response::{exit_code_for_error, print_error, print_result};
