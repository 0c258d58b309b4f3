use clap::Args;

use super::interface::{DecodedPath, ExplorerCommand, ExplorerContext, ExplorerValues};
use crate::error::{ExplorerError, Result};
use crate::hash_codec;

/// Decode a URL fragment into the root type and field names it names.
#[derive(Debug, Args)]
pub struct Decode {
    /// Fragment to decode, with or without the leading `#`.
    #[clap(value_parser)]
    fragment: String,
}

#[derive(Debug)]
pub struct DecodeCommand {
    pub args: Decode,
}

impl ExplorerCommand for DecodeCommand {
    fn execute(&self, ctx: &ExplorerContext) -> Result<ExplorerValues> {
        let path = hash_codec::decode(&self.args.fragment, &ctx.graph).ok_or_else(|| {
            ExplorerError::bad_input(format!(
                "fragment [{}] does not name a type in the graph",
                self.args.fragment
            ))
        })?;
        Ok(ExplorerValues::DecodedPath(DecodedPath {
            fragment: hash_codec::encode(&path),
            root: path.root,
            fields: path.fields,
        }))
    }
}
