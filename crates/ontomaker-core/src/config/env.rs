use std::path::PathBuf;

#[must_use]
pub(super) fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[must_use]
pub(super) fn read_env_path(name: &str) -> Option<PathBuf> {
    read_non_empty_env(name).map(PathBuf::from)
}

#[must_use]
pub(super) fn parse_enabled_default_true(raw: Option<&str>) -> bool {
    !matches!(
        raw.map(|value| value.trim().to_ascii_lowercase())
            .as_deref(),
        Some("off" | "none" | "0" | "false")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_enabled_default_true_only_disables_known_off_values() {
        assert!(parse_enabled_default_true(None));
        assert!(parse_enabled_default_true(Some("yes")));
        assert!(parse_enabled_default_true(Some("")));
        assert!(!parse_enabled_default_true(Some(" OFF ")));
        assert!(!parse_enabled_default_true(Some("0")));
        assert!(!parse_enabled_default_true(Some("false")));
        assert!(!parse_enabled_default_true(Some("none")));
    }
}
