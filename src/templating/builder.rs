use std::borrow;

use include_dir::{include_dir, Dir};
use liquid::Template;

use super::liquid_exts::{
    EscapeScriptFilterParser, ShortTypeNameFilterParser, StripSuffixFilterParser,
    TypePackageFilterParser,
};
use crate::error::{ErrorDetails, ErrorLayer, ExplorerError, Result};

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

#[derive(Default, Debug, Clone, Copy)]
struct StaticTemplateSource;

impl liquid::partials::PartialSource for StaticTemplateSource {
    fn contains(&self, name: &str) -> bool {
        TEMPLATE_DIR.get_file(name).is_some()
    }

    fn names(&self) -> Vec<&str> {
        TEMPLATE_DIR
            .files()
            .filter_map(|file| file.path().to_str())
            .collect()
    }

    fn try_get<'a>(&'a self, name: &str) -> Option<borrow::Cow<'a, str>> {
        TEMPLATE_DIR
            .get_file(name)
            .and_then(|file| file.contents_utf8())
            .map(borrow::Cow::from)
    }
}

pub fn build_and_parse(s: &str) -> Result<Template> {
    let parser = liquid::ParserBuilder::with_stdlib()
        .filter(EscapeScriptFilterParser)
        .filter(ShortTypeNameFilterParser)
        .filter(StripSuffixFilterParser)
        .filter(TypePackageFilterParser)
        .partials(liquid::partials::LazyCompiler::<StaticTemplateSource>::empty())
        .build()?;
    Ok(parser.parse(s)?)
}

fn template_source(name: &str) -> Result<&'static str> {
    TEMPLATE_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| {
            ExplorerError::Render(ErrorDetails {
                layer: ErrorLayer::UnknownLayer,
                message: format!("missing template {}", name),
            })
        })
}

pub fn build_and_parse_explorer() -> Result<Template> {
    build_and_parse(template_source("explorer.liquid")?)
}

#[test]
fn test_filters_are_registered() {
    let template = build_and_parse(
        "{{ t | short_type_name }}|{{ t | type_package }}|{{ css | strip_suffix: \".css\" }}|{{ j | escape_script }}",
    )
    .unwrap();
    let globals = liquid::object!({
        "t": "k8s.io/api/core/v1.Pod",
        "css": "themes/dark.css",
        "j": "\"</b>\"",
    });
    assert_eq!(
        template.render(&globals).unwrap(),
        "Pod|k8s.io/api/core/v1|themes/dark|\"\\u003c/b>\""
    );
}
