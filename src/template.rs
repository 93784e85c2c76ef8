//! Flat `{{path}}` template substitution.
//!
//! Only flat dotted-path tokens are supported. Handlebars-style block
//! helpers (`{{#each}}`, `{{/each}}`, `{{#if}}`) are a documented
//! limitation: the token scanner does not match them, so they pass through
//! verbatim. Plain tokens whose path does not resolve substitute to the
//! empty string — never an error, never the literal token.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::value_path::{display_string, lookup_path};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\s*\}\}").unwrap());

/// Substitute every `{{path}}` token with the string form of the dotted
/// path looked up in `data`.
pub fn substitute(template: &str, data: &Value) -> String {
    TOKEN_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            lookup_path(data, &caps[1])
                .map(display_string)
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_flat_paths() {
        let data = json!({"name": "Ada", "org": {"city": "Oslo"}});
        assert_eq!(
            substitute("{{name}} works in {{org.city}}", &data),
            "Ada works in Oslo"
        );
    }

    #[test]
    fn unresolved_paths_become_empty() {
        let data = json!({"name": "Ada"});
        assert_eq!(substitute("Hello {{missing}}!", &data), "Hello !");
        assert_eq!(substitute("{{a.b.c}}", &data), "");
    }

    #[test]
    fn whitespace_inside_token_is_tolerated() {
        assert_eq!(substitute("{{ name }}", &json!({"name": "x"})), "x");
    }

    #[test]
    fn values_stringify_like_display() {
        let data = json!({"n": 5, "flag": true, "none": null});
        assert_eq!(substitute("{{n}}/{{flag}}/{{none}}", &data), "5/true/");
    }

    #[test]
    fn block_helpers_pass_through_verbatim() {
        let template = "{{#each items}}{{name}}{{/each}}";
        let out = substitute(template, &json!({"name": "x", "items": [1]}));
        assert_eq!(out, "{{#each items}}x{{/each}}");
    }
}
