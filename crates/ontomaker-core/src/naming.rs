use crate::error::{MakerError, Result};

pub const API_NAME_PATTERN: &str = "/^([a-zA-Z][a-zA-Z0-9\\-]*)$/";

#[must_use]
pub fn is_valid_api_name(raw: &str) -> bool {
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic() && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

/// Checks an API name before it is namespaced.
///
/// Names that already carry a namespace are validated on their last segment only.
pub fn validate_api_name(raw: &str) -> Result<()> {
    let local = raw.rsplit_once('.').map_or(raw, |(_, tail)| tail);
    if is_valid_api_name(local) {
        return Ok(());
    }
    Err(MakerError::InvalidApiName(format!(
        "Invalid API name {raw}. API names must match the regex {API_NAME_PATTERN}."
    )))
}

/// Normalizes a namespace to its prefix form: dotted segments with one trailing `.`.
///
/// An empty namespace stays empty.
pub fn normalize_namespace(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let body = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if body.split('.').any(|segment| !is_valid_api_name(segment)) {
        return Err(MakerError::InvalidApiName(format!(
            "Invalid namespace {raw}. Each namespace segment must match the regex {API_NAME_PATTERN}."
        )));
    }
    Ok(format!("{body}."))
}

/// Prefixes `api_name` with `namespace` unless it already contains a `.`.
#[must_use]
pub fn add_namespace_if_none(namespace: &str, api_name: &str) -> String {
    if api_name.contains('.') {
        api_name.to_string()
    } else {
        format!("{namespace}{api_name}")
    }
}

#[must_use]
pub fn strip_namespace<'a>(namespace: &str, api_name: &'a str) -> &'a str {
    if namespace.is_empty() {
        return api_name;
    }
    api_name.strip_prefix(namespace).unwrap_or(api_name)
}

#[must_use]
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn plural_display_name(raw: &str) -> String {
    if raw.ends_with('s') {
        capitalize(raw)
    } else {
        format!("{}s", capitalize(raw))
    }
}

/// Lowercase words joined by `-`, split on case changes, digit runs and separators.
#[must_use]
pub fn kebab_case(raw: &str) -> String {
    let chars = raw.chars().collect::<Vec<_>>();
    let mut words = Vec::<String>::new();
    let mut current = String::new();

    for (idx, ch) in chars.iter().copied().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            flush_word(&mut words, &mut current);
            continue;
        }
        if let Some(prev) = idx.checked_sub(1).and_then(|prev_idx| chars.get(prev_idx)) {
            let prev = *prev;
            let next = chars.get(idx + 1).copied();
            let lower_to_upper = ch.is_ascii_uppercase() && !prev.is_ascii_uppercase();
            let acronym_end = ch.is_ascii_uppercase()
                && prev.is_ascii_uppercase()
                && next.is_some_and(|value| value.is_ascii_lowercase());
            let digit_edge = prev.is_ascii_alphanumeric() && ch.is_ascii_digit() != prev.is_ascii_digit();
            if prev.is_ascii_alphanumeric() && (lower_to_upper || acronym_end || digit_edge) {
                flush_word(&mut words, &mut current);
            }
        }
        current.push(ch.to_ascii_lowercase());
    }
    flush_word(&mut words, &mut current);
    words.join("-")
}

fn flush_word(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Joins id components with `-`.
///
/// Deployed automations resolve their references through these strings, so the join must
/// stay byte-stable across releases.
#[must_use]
pub fn readable_id(parts: &[&str]) -> String {
    parts.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_api_name_rejects_leading_digit_and_symbols() {
        assert!(validate_api_name("fooBar-2").is_ok());
        assert!(validate_api_name("com.palantir.foo").is_ok());

        let err = validate_api_name("1foo").expect_err("leading digit must fail");
        assert_eq!(
            err.to_string(),
            "Invalid API name 1foo. API names must match the regex /^([a-zA-Z][a-zA-Z0-9\\-]*)$/."
        );
        assert!(validate_api_name("foo_bar").is_err());
        assert!(validate_api_name("").is_err());
    }

    #[test]
    fn namespace_prefix_is_applied_exactly_once() {
        assert_eq!(add_namespace_if_none("com.palantir.", "foo"), "com.palantir.foo");
        assert_eq!(
            add_namespace_if_none("com.palantir.", "com.other.foo"),
            "com.other.foo"
        );
        let once = add_namespace_if_none("com.palantir.", "foo");
        assert_eq!(add_namespace_if_none("com.palantir.", &once), once);
    }

    #[test]
    fn normalize_namespace_appends_single_trailing_dot() {
        assert_eq!(normalize_namespace("com.palantir").expect("ns"), "com.palantir.");
        assert_eq!(normalize_namespace("com.palantir.").expect("ns"), "com.palantir.");
        assert_eq!(normalize_namespace("  ").expect("ns"), "");
        assert!(normalize_namespace("com..palantir").is_err());
    }

    #[test]
    fn kebab_case_splits_camel_case_and_digits() {
        assert_eq!(kebab_case("fizzToFoo"), "fizz-to-foo");
        assert_eq!(kebab_case("barToBuzz"), "bar-to-buzz");
        assert_eq!(kebab_case("XMLHttpLink"), "xml-http-link");
        assert_eq!(kebab_case("foo2Bar"), "foo-2-bar");
        assert_eq!(kebab_case("already-kebab"), "already-kebab");
    }

    #[test]
    fn display_name_helpers_capitalize_and_pluralize() {
        assert_eq!(capitalize("buzz"), "Buzz");
        assert_eq!(capitalize(""), "");
        assert_eq!(plural_display_name("foo"), "Foos");
        assert_eq!(plural_display_name("bus"), "Bus");
    }

    #[test]
    fn readable_id_is_plain_concatenation() {
        assert_eq!(readable_id(&["object-type", "com.palantir.foo"]), "object-type-com.palantir.foo");
        assert_eq!(strip_namespace("com.palantir.", "com.palantir.foo"), "foo");
        assert_eq!(strip_namespace("", "foo"), "foo");
    }
}
