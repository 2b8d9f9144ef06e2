//! Shell quoting for command display

/// Quote `value` for a POSIX shell. Plain words are returned unchanged.
pub fn shell_escape(value: &str) -> String {
    if !value.is_empty()
        && value.chars().all(|ch| {
            ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch == '.' || ch == '/'
        })
    {
        return value.to_string();
    }
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_escape_plain() {
        assert_eq!(shell_escape("src/main.rs"), "src/main.rs");
        assert_eq!(shell_escape("v1.2-rc_3"), "v1.2-rc_3");
    }

    #[test]
    fn test_shell_escape_quotes() {
        assert_eq!(shell_escape("my file.txt"), "'my file.txt'");
        assert_eq!(shell_escape("it's"), "'it'\\''s'");
        assert_eq!(shell_escape(""), "''");
        assert_eq!(shell_escape("$(rm -rf /)"), "'$(rm -rf /)'");
    }
}
