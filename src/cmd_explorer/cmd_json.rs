use clap::Args;

use super::interface::{ExplorerCommand, ExplorerContext, ExplorerValues};
use crate::error::Result;

/// Re-emit the graph with members sorted by name and every doc comment
/// carrying its parsed form.
#[derive(Debug, Args)]
pub struct Json {}

#[derive(Debug)]
pub struct JsonCommand;

impl ExplorerCommand for JsonCommand {
    fn execute(&self, ctx: &ExplorerContext) -> Result<ExplorerValues> {
        let normalized = ctx.graph.normalized();
        Ok(ExplorerValues::JsonValue(serde_json::to_value(&normalized)?))
    }
}
