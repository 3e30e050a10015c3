// src/utils.rs
use std::path::PathBuf;

/// Truncate to at most `max_chars` characters, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Collapse all runs of whitespace (including newlines) into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut a title down for log lines
pub fn short_title(title: &str) -> &str {
    truncate_chars(title, 50)
}

/// Resolve a configured path against the current working directory
pub fn resolve_path(path: &PathBuf) -> PathBuf {
    if path.is_absolute() {
        path.clone()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Senior\n\n  Rust   Engineer \t"), "Senior Rust Engineer");
        assert_eq!(clean_text("\n\n"), "");
    }

    #[test]
    fn test_resolve_path_keeps_absolute() {
        let absolute = PathBuf::from("/var/lib/jobs.db");
        assert_eq!(resolve_path(&absolute), absolute);
        assert!(resolve_path(&PathBuf::from("data/jobs.db")).is_absolute());
    }
}
