use clap::Args;

use super::interface::{
    ColumnSummary, ExplorerCommand, ExplorerContext, ExplorerValues, NavigationReport,
};
use crate::error::{ExplorerError, Result};
use crate::host::{Host, MemoryHost};
use crate::input_router::{Focus, InputEvent, InputRouter, Key};
use crate::navigation::NavigationEngine;
use crate::search_index::SearchIndex;

/// Replay a sequence of interactions against the explorer and report where it
/// ends up.
///
/// Steps are key names (`up`, `down`, `left`, `right`, `enter`, `esc`, `/`,
/// `backspace`), `text:<chars>` to type into the search box,
/// `click:<column>:<entry>`, `doc:<column>:<entry>`, `result:<n>`,
/// `backdrop`, `help`, `back`, `forward` and `goto:<fragment>`.
#[derive(Debug, Args)]
pub struct Navigate {
    /// Fragment the page is opened with.
    #[clap(long, value_parser)]
    fragment: Option<String>,

    /// Start type when there is no usable fragment; overrides the config.
    #[clap(long = "type", short = 't', value_parser)]
    start_type: Option<String>,

    #[clap(value_parser)]
    steps: Vec<String>,
}

#[derive(Debug)]
pub struct NavigateCommand {
    pub args: Navigate,
}

#[derive(Debug, PartialEq)]
enum Step {
    Input(InputEvent),
    Text(String),
    Back,
    Forward,
    Goto(String),
}

fn parse_index(s: &str, step: &str) -> Result<usize> {
    s.parse()
        .map_err(|_| ExplorerError::bad_input(format!("bad index in step [{}]", step)))
}

fn parse_step(step: &str) -> Result<Step> {
    let mut parts = step.splitn(2, ':');
    let head = parts.next().unwrap_or("");
    let rest = parts.next();

    let parsed = match (head, rest) {
        ("text", Some(text)) => Step::Text(text.to_string()),
        ("goto", Some(fragment)) => Step::Goto(fragment.to_string()),
        ("result", Some(n)) => Step::Input(InputEvent::ClickSearchResult(parse_index(n, step)?)),
        ("click", Some(pos)) | ("doc", Some(pos)) => {
            let (column, entry) = match pos.split_once(':') {
                Some((c, e)) => (parse_index(c, step)?, parse_index(e, step)?),
                None => return Err(ExplorerError::bad_input(format!("bad step [{}]", step))),
            };
            if head == "click" {
                Step::Input(InputEvent::ClickEntry { column, entry })
            } else {
                Step::Input(InputEvent::ClickDocToggle { column, entry })
            }
        }
        ("back", None) => Step::Back,
        ("forward", None) => Step::Forward,
        ("backdrop", None) => Step::Input(InputEvent::ClickBackdrop),
        ("help", None) => Step::Input(InputEvent::ClickHelp),
        _ => match Key::from_name(step) {
            Some(key) => Step::Input(InputEvent::key(key)),
            None => return Err(ExplorerError::bad_input(format!("unknown step [{}]", step))),
        },
    };
    Ok(parsed)
}

impl ExplorerCommand for NavigateCommand {
    fn execute(&self, ctx: &ExplorerContext) -> Result<ExplorerValues> {
        let steps = self
            .args
            .steps
            .iter()
            .map(|s| parse_step(s))
            .collect::<Result<Vec<_>>>()?;

        let host = MemoryHost::with_fragment(self.args.fragment.as_deref().unwrap_or(""));
        let start_type = self
            .args
            .start_type
            .clone()
            .or_else(|| ctx.config.start_type.clone());
        let mut engine = NavigationEngine::new(&ctx.graph, host).with_start_type(start_type);
        let index = SearchIndex::new(&ctx.graph).with_limit(ctx.config.search_limit);
        let mut router = InputRouter::new(index);

        engine.init();
        for step in steps {
            trace!(step = ?step, "replaying");
            match step {
                Step::Input(event) => {
                    router.handle(&mut engine, event);
                }
                Step::Text(text) => {
                    // The search box has focus while the overlay is open.
                    let focus = if router.overlay().open {
                        Focus::TextInput
                    } else {
                        Focus::Page
                    };
                    for c in text.chars() {
                        router.handle(
                            &mut engine,
                            InputEvent::Key {
                                key: Key::Char(c),
                                focus,
                            },
                        );
                    }
                }
                Step::Back => {
                    engine.host_mut().back();
                }
                Step::Forward => {
                    engine.host_mut().forward();
                }
                Step::Goto(fragment) => engine.host_mut().navigate(&fragment),
            }
            engine.run_until_idle();
        }

        Ok(ExplorerValues::NavigationReport(NavigationReport {
            fragment: engine.host().fragment(),
            path: engine.current_path().map(|p| p.to_string()),
            columns: ColumnSummary::from_plan(engine.plan()),
            active: engine.active_selection(),
            restores: engine.restore_count(),
            overlay: router.overlay().clone(),
        }))
    }
}
