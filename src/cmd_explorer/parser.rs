use clap::{Parser, Subcommand, ValueEnum};

use super::cmd_decode::Decode;
use super::cmd_html::Html;
use super::cmd_json::Json;
use super::cmd_navigate::Navigate;
use super::cmd_search::Search;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Pretty,
    /// Un-pretty-printed JSON.
    Concise,
}

/// Explore a type graph as cascading columns.
#[derive(Debug, Parser)]
#[command(name = "rex", version)]
pub struct ToolOpts {
    /// Type graph JSON as emitted by the generator.
    #[clap(long, global = true, env = "REX_GRAPH", value_parser)]
    pub graph: Option<String>,

    /// Optional TOML file with page settings.
    #[clap(long, global = true, env = "REX_CONFIG", value_parser)]
    pub config: Option<String>,

    /// Where to write the result; `-` is stdout.
    #[clap(long, short = 'o', global = true, default_value = "-", value_parser)]
    pub output: String,

    #[clap(long, short = 'f', global = true, value_enum, ignore_case = true, default_value = "pretty")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Decode(Decode),
    Html(Html),
    Json(Json),
    Navigate(Navigate),
    Search(Search),
}
