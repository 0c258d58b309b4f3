use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::Parser;

use super::cmd_decode::DecodeCommand;
use super::cmd_html::HtmlCommand;
use super::cmd_json::JsonCommand;
use super::cmd_navigate::NavigateCommand;
use super::cmd_search::SearchCommand;
use super::interface::{ExplorerCommand, ExplorerContext, ExplorerValues};
use super::parser::{Command, OutputFormat, ToolOpts};
use crate::config::ExplorerConfig;
use crate::error::{ErrorDetails, ErrorLayer, ExplorerError, Result};
use crate::file_format::type_graph::read_type_graph;

pub fn build_command(cmd: Command) -> Box<dyn ExplorerCommand> {
    match cmd {
        Command::Decode(d) => Box::new(DecodeCommand { args: d }),
        Command::Html(h) => Box::new(HtmlCommand { args: h }),
        Command::Json(_) => Box::new(JsonCommand),
        Command::Navigate(n) => Box::new(NavigateCommand { args: n }),
        Command::Search(s) => Box::new(SearchCommand { args: s }),
    }
}

pub fn build_context(graph: Option<&str>, config: Option<&str>) -> Result<ExplorerContext> {
    let graph_path =
        graph.ok_or_else(|| ExplorerError::bad_input("--graph (or REX_GRAPH) is required"))?;
    let config = ExplorerConfig::load(config)?;
    let graph = read_type_graph(graph_path)?;
    Ok(ExplorerContext { graph, config })
}

/// A finished command and where its values should go.
#[derive(Debug)]
pub struct CommandOutput {
    pub output: String,
    pub format: OutputFormat,
    pub values: ExplorerValues,
}

impl CommandOutput {
    /// Write the values to the `--output` file, or stdout for `-`.
    pub fn emit(&self) -> Result<()> {
        if self.output == "-" {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            self.values.write(self.format, &mut lock)?;
            lock.flush()?;
        } else {
            let mut file = BufWriter::new(File::create(&self.output)?);
            self.values.write(self.format, &mut file)?;
            file.flush()?;
            info!("Wrote {}", self.output);
        }
        Ok(())
    }
}

/// Parse `args` (including the program name) and run the command they name.
pub fn run_command_line<I, T>(args: I) -> Result<CommandOutput>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let opts = ToolOpts::try_parse_from(args).map_err(|err| {
        ExplorerError::Malformed(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: err.to_string(),
        })
    })?;
    run_opts(opts)
}

pub fn run_opts(opts: ToolOpts) -> Result<CommandOutput> {
    let ToolOpts {
        graph,
        config,
        output,
        output_format,
        cmd,
    } = opts;
    let ctx = build_context(graph.as_deref(), config.as_deref())?;

    let command = build_command(cmd);
    trace!(command = ?command, "executing");
    let values = command.execute(&ctx)?;
    Ok(CommandOutput {
        output,
        format: output_format,
        values,
    })
}
