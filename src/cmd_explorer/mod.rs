pub mod builder;
pub mod interface;
pub mod parser;

mod cmd_decode;
mod cmd_html;
mod cmd_json;
mod cmd_navigate;
mod cmd_search;

pub use builder::{build_command, run_command_line, run_opts, CommandOutput};
pub use interface::{ExplorerCommand, ExplorerContext, ExplorerValues};
