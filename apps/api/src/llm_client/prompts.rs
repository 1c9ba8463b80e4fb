// Shared prompt fragments.
// Each service that needs oracle calls defines its own prompts.rs alongside it.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Instruction appended to prompts that expect a single JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with one valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Use null for information that is not present.";

fn placeholder_pattern() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"))
}

/// Fills `{name}` placeholders in one pass over the template.
///
/// Substituted values are never rescanned, so user text containing a
/// placeholder name is sent verbatim. Unknown names are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_placeholders() {
        let filled = fill_template("Hi {name}, see {json_only}", &[("name", "Ann"), ("json_only", "JSON")]);
        assert_eq!(filled, "Hi Ann, see JSON");
    }

    #[test]
    fn test_fill_template_does_not_expand_inserted_values() {
        let filled = fill_template(
            "JD: {job_description}\nCV: {resume_text}",
            &[("job_description", "Describe {resume_text} here"), ("resume_text", "CV BODY")],
        );
        assert_eq!(filled, "JD: Describe {resume_text} here\nCV: CV BODY");
        assert_eq!(filled.matches("CV BODY").count(), 1);
    }

    #[test]
    fn test_fill_template_keeps_json_braces_and_unknown_names() {
        let filled = fill_template("{\n  \"score\": 1\n} {other}", &[("name", "x")]);
        assert_eq!(filled, "{\n  \"score\": 1\n} {other}");
    }
}
