use clap::Args;

use super::interface::{ExplorerCommand, ExplorerContext, ExplorerValues, TypeList};
use crate::error::Result;
use crate::search_index::SearchIndex;

/// List the root types the quick-open overlay would offer for a filter.
#[derive(Debug, Args)]
pub struct Search {
    /// Case-insensitive substring of the fully qualified type name.
    #[clap(value_parser, default_value = "")]
    filter: String,

    /// Maximum number of results; overrides the config's `search_limit`.
    #[clap(short, long, value_parser)]
    limit: Option<usize>,
}

#[derive(Debug)]
pub struct SearchCommand {
    pub args: Search,
}

impl ExplorerCommand for SearchCommand {
    fn execute(&self, ctx: &ExplorerContext) -> Result<ExplorerValues> {
        let limit = self.args.limit.unwrap_or(ctx.config.search_limit);
        let index = SearchIndex::new(&ctx.graph).with_limit(limit);
        let types = index
            .query(&self.args.filter)
            .into_iter()
            .map(String::from)
            .collect();
        Ok(ExplorerValues::TypeList(TypeList { types }))
    }
}
