extern crate serde;
extern crate serde_json;

extern crate clap;
extern crate include_dir;
#[macro_use]
extern crate lazy_static;
extern crate lexical_sort;
extern crate liquid;
extern crate regex;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

pub mod cmd_explorer;
pub mod config;
pub mod doc_render;
pub mod error;
pub mod file_format;
pub mod hash_codec;
pub mod host;
pub mod input_router;
pub mod links;
pub mod logging;
pub mod nav_path;
pub mod navigation;
pub mod output;
pub mod render_plan;
pub mod search_index;
pub mod templating;
