use liquid_core::Expression;
use liquid_core::FilterParameters;
use liquid_core::FromFilterParameters;
use liquid_core::Result;
use liquid_core::Runtime;
use liquid_core::{Display_filter, Filter, FilterReflection, ParseFilter};
use liquid_core::{Value, ValueView};

use crate::file_format::type_graph::split_type_name;

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "escape_script",
    description = "Make a JSON string safe to embed inside a <script> element.",
    parsed(EscapeScriptFilter)
)]
pub struct EscapeScriptFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "escape_script"]
struct EscapeScriptFilter;

impl Filter for EscapeScriptFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = input.to_kstr();
        Ok(Value::scalar(escape_script(&s)))
    }
}

/// `<` only ever appears inside JSON strings, where `\u003c` means the same
/// thing and can't end the script element or open a comment.
pub fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "short_type_name",
    description = "The type name after its package, e.g. Pod for k8s.io/api/core/v1.Pod.",
    parsed(ShortTypeNameFilter)
)]
pub struct ShortTypeNameFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "short_type_name"]
struct ShortTypeNameFilter;

impl Filter for ShortTypeNameFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = input.to_kstr();
        Ok(Value::scalar(split_type_name(&s).1.to_string()))
    }
}

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "type_package",
    description = "The package of a fully qualified type name, or the empty string.",
    parsed(TypePackageFilter)
)]
pub struct TypePackageFilterParser;

#[derive(Debug, Default, Display_filter)]
#[name = "type_package"]
struct TypePackageFilter;

impl Filter for TypePackageFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> Result<Value> {
        let s = input.to_kstr();
        Ok(Value::scalar(split_type_name(&s).0.to_string()))
    }
}

#[derive(Debug, FilterParameters)]
struct StripSuffixArgs {
    #[parameter(description = "The suffix to remove if it exists.", arg_type = "str")]
    suffix: Expression,
}

#[derive(Clone, ParseFilter, FilterReflection)]
#[filter(
    name = "strip_suffix",
    description = "Strip the suffix of the input string if it matches, otherwise return it unchanged",
    parameters(StripSuffixArgs),
    parsed(StripSuffixFilter)
)]
pub struct StripSuffixFilterParser;

#[derive(Debug, FromFilterParameters, Display_filter)]
#[name = "strip_suffix"]
struct StripSuffixFilter {
    #[parameters]
    args: StripSuffixArgs,
}

impl Filter for StripSuffixFilter {
    fn evaluate(&self, input: &dyn ValueView, runtime: &dyn Runtime) -> Result<Value> {
        let args = self.args.evaluate(runtime)?;

        let s = input.to_kstr();
        let s = s.as_str();
        let stripped = s.strip_suffix(args.suffix.as_str()).unwrap_or(s);
        Ok(Value::scalar(stripped.to_string()))
    }
}

#[test]
fn test_escape_script() {
    assert_eq!(
        escape_script(r#"{"doc":"</script><!-- x"}"#),
        r#"{"doc":"\u003c/script>\u003c!-- x"}"#
    );
}
