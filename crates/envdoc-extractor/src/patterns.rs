//! Lexical recognizers for struct declarations
//!
//! Every construct the extractor understands is described here. The tagged and
//! untagged field patterns are assembled from the same name/type fragments so
//! the two field passes stay structurally parallel.
//!
//! Named groups used across patterns:
//! - `doc`: the comment block directly above a construct (possibly empty)
//! - `name` / `type`: field identifier and declared type
//! - `tag` / `omitempty`: serialization key and its omit-when-empty qualifier

use once_cell::sync::Lazy;
use regex::Regex;

/// Comment marker introducing an expand directive
pub const EXPAND_MARKER: &str = "TYKCONFIGEXPAND";

/// Comment marker introducing a plugin configuration struct
pub const PLUGIN_MARKER: &str = "@PumpConf";

const DOC_BLOCK: &str = r"(?P<doc>(?:\t+//[^\n]*\n)*)";
const FIELD_NAME: &str = r"(?P<name>[_.\w]+)";
const FIELD_TYPE: &str = r"(?P<type>[{}*.\[\]\w]+)";
const JSON_TAG: &str = r#"json:"(?P<tag>[-.\w]+)(?P<omitempty>,omitempty)?""#;

/// Field line carrying a `json:"..."` serialization tag
///
/// Anchored at a line start so indented text inside a comment is never read
/// as a field.
pub static FIELD_WITH_TAG: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?m)^{DOC_BLOCK}\t+{FIELD_NAME} +{FIELD_TYPE}.+`.*{JSON_TAG}.*"
    ))
});

/// Field line without a serialization tag
pub static FIELD_WITHOUT_TAG: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?m)^{DOC_BLOCK}\t+{FIELD_NAME} +{FIELD_TYPE}")));

/// Header line of an anonymous nested struct, e.g. `\tListen struct {`
///
/// The block ends at the first line made of the same indentation followed by
/// `}`; see [`NESTED_CLOSE_TAG`] for the optional tag after that brace.
pub static NESTED_STRUCT: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?m)^{DOC_BLOCK}(?P<indent>\t+){FIELD_NAME} +struct \{{[ \t]*$"
    ))
});

/// Serialization tag following the closing brace of a nested struct
pub static NESTED_CLOSE_TAG: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"^[ \t]*`[^`]*{JSON_TAG}")));

/// `map[K]` declarator at the start of a type, optionally followed by `[]`
pub static MAP_DECLARATOR: Lazy<Regex> =
    Lazy::new(|| compile(r"^map\[(?P<key>[.\w]+)\](?P<slice>\[\])?"));

/// Plugin declaration: the marker comment directly above the plugin's struct
pub static PLUGIN_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"//[ \t]*{}[ \t]+(?P<kind>\w+)[ \t]*\ntype (?P<name>\w+) struct \{{",
        regex::escape(PLUGIN_MARKER)
    ))
});

/// Expand directive: the marker comment followed by an embedded type line
pub static EXPAND_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"\t+// {EXPAND_MARKER}\n\t+(?P<target>[.\w]+)(?P<tail> [^\n]*)?\n"
    ))
});

/// Header of a struct declaration, e.g. `type Config struct {`
///
/// The declaration runs to the first closing brace at column zero, or ends
/// right after the header for one-line empty structs (`{}`).
pub static STRUCT_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"\btype (?P<name>\w+) struct \{"));

#[expect(clippy::panic, reason = "built-in patterns are constant")]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid built-in pattern {pattern:?}: {err}"))
}
