use clap::Args;

use super::interface::{ExplorerCommand, ExplorerContext, ExplorerValues, TextFile};
use crate::error::{ExplorerError, Result};
use crate::host::MemoryHost;
use crate::navigation::NavigationEngine;
use crate::output::columns_html;
use crate::templating::builder::build_and_parse_explorer;
use crate::templating::liquid_exts::escape_script;

/// Generate the self-contained explorer page.
#[derive(Debug, Args)]
pub struct Html {
    /// Type the page opens on; overrides the config's `start_type`.
    #[clap(long = "type", short = 't', value_parser)]
    start_type: Option<String>,

    /// Fragment whose columns are pre-rendered into the page.
    #[clap(long, value_parser)]
    path: Option<String>,

    /// Page title; overrides the config.
    #[clap(long, value_parser)]
    title: Option<String>,
}

#[derive(Debug)]
pub struct HtmlCommand {
    pub args: Html,
}

impl ExplorerCommand for HtmlCommand {
    fn execute(&self, ctx: &ExplorerContext) -> Result<ExplorerValues> {
        let config = &ctx.config;
        let start_type = self
            .args
            .start_type
            .clone()
            .or_else(|| config.start_type.clone());
        if let Some(start) = &start_type {
            if !ctx.graph.contains(start) {
                return Err(ExplorerError::bad_input(format!(
                    "start type [{}] is not in the graph",
                    start
                )));
            }
        }

        // Lay the columns out exactly the way the page would on load.
        let host = MemoryHost::with_fragment(self.args.path.as_deref().unwrap_or(""));
        let mut engine =
            NavigationEngine::new(&ctx.graph, host).with_start_type(start_type.clone());
        engine.init();
        let columns = columns_html(engine.plan(), 2)?;

        let start_type = start_type.unwrap_or_default();
        let type_data_json = serde_json::to_string(&ctx.graph.to_value())?;
        let start_type_json = escape_script(&serde_json::to_string(&start_type)?);
        let title = self.args.title.as_ref().unwrap_or(&config.title);

        let globals = liquid::object!({
            "title": title,
            "start_type": start_type,
            "start_type_json": start_type_json,
            "default_theme": config.default_theme,
            "themes": config.theme_list(),
            "search_limit": config.search_limit as i64,
            "type_data_json": type_data_json,
            "columns_html": columns,
        });

        let template = build_and_parse_explorer()?;
        let contents = template.render(&globals)?;
        info!(bytes = contents.len(), "rendered explorer page");

        Ok(ExplorerValues::TextFile(TextFile {
            mime_type: "text/html".to_string(),
            contents,
        }))
    }
}
