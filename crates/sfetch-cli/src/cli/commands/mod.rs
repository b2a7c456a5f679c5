//! CLI command handlers, one per file.

mod fetch;
mod middle;
mod parse;

pub use fetch::run_fetch;
pub use middle::run_middle;
pub use parse::run_parse;
