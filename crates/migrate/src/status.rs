//! Status-line recovery from captured migration output
//!
//! When a batch fails, per-step detail only exists in the text the framework
//! printed along the way: one `Applying <component>.<migration>... OK` line
//! per finished step. That phrasing is observed framework behavior, not a
//! committed contract, so the recognizer lives in this one module and nothing
//! else in the crate knows the line format.

use std::sync::OnceLock;

use regex::Regex;

fn ansi_pattern() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    // Both the two-byte `ESC [` introducer and the single-byte CSI form.
    ANSI.get_or_init(|| Regex::new(r"(\x9B|\x1B\[)[0-?]*[ -/]*[@-~]").expect("valid ANSI pattern"))
}

fn status_pattern() -> &'static Regex {
    static STATUS: OnceLock<Regex> = OnceLock::new();
    STATUS.get_or_init(|| {
        // Component and migration are word characters; migration identifiers
        // never contain dots, so the literal ellipsis is unambiguous.
        Regex::new(r"^Applying (?P<component>\w+)\.(?P<migration>\w+)\.{3}(?P<trailing>.*)$")
            .expect("valid status pattern")
    })
}

/// Remove ANSI terminal escape sequences so colored output matches like
/// plain output.
pub fn strip_ansi(text: &str) -> String {
    ansi_pattern().replace_all(text, "").into_owned()
}

/// One recognized step status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub component: String,
    pub migration: String,
    /// The line ended in a case-sensitive `OK` after optional whitespace.
    /// Any other tail (lowercase `ok`, another token, nothing) means the
    /// step did not finish.
    pub ok: bool,
    /// The stripped, trimmed line as it appeared in the output.
    pub line: String,
}

/// Parse one line of captured output.
///
/// Returns `None` for lines that do not have the status-line shape; those
/// are not step markers and cause no state change in the caller.
pub fn parse_status_line(raw: &str) -> Option<StatusLine> {
    let stripped = strip_ansi(raw);
    let line = stripped.trim();
    let captures = status_pattern().captures(line)?;
    let ok = captures
        .name("trailing")
        .map_or(false, |tail| tail.as_str().trim() == "OK");
    Some(StatusLine {
        component: captures["component"].to_string(),
        migration: captures["migration"].to_string(),
        ok,
        line: line.to_string(),
    })
}

/// All status lines of a captured output blob, in emission order.
pub fn scan_status_lines(output: &str) -> impl Iterator<Item = StatusLine> + '_ {
    output.lines().filter_map(parse_status_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> StatusLine {
        parse_status_line(line).expect("line should have status shape")
    }

    #[test]
    fn test_plain_ok_line() {
        let status = parsed("Applying app1.9999_final... OK");
        assert_eq!(status.component, "app1");
        assert_eq!(status.migration, "9999_final");
        assert!(status.ok);
    }

    #[test]
    fn test_line_without_status_tail_is_not_ok() {
        let status = parsed("Applying crazy_app.11111111_n_e_w_f_i_e_l_d... ");
        assert_eq!(status.migration, "11111111_n_e_w_f_i_e_l_d");
        assert!(!status.ok);
    }

    #[test]
    fn test_missing_component_is_not_a_status_line() {
        assert_eq!(parse_status_line("Applying .0001_dot_with_no_app... "), None);
    }

    #[test]
    fn test_missing_dot_is_not_a_status_line() {
        assert_eq!(parse_status_line("Applying 0001_no_app... "), None);
    }

    #[test]
    fn test_copious_whitespace_before_ok() {
        assert!(parsed("Applying testapp.0001_padded...                    OK").ok);
    }

    #[test]
    fn test_no_space_between_ellipsis_and_ok() {
        assert!(parsed("Applying testapp.0001_tight...OK").ok);
    }

    #[test]
    fn test_lowercase_ok_is_not_success() {
        assert!(!parsed("Applying testapp.0001_lowercase... ok").ok);
    }

    #[test]
    fn test_migration_without_digits_still_matches() {
        let status = parsed("Applying testapp.amigration_with_no_number... ");
        assert!(!status.ok);
    }

    #[test]
    fn test_other_status_token_is_not_success() {
        assert!(!parsed("Applying testapp.amigration... KOK").ok);
    }

    #[test]
    fn test_unrelated_lines_are_skipped() {
        assert_eq!(parse_status_line("Operations to perform:"), None);
        assert_eq!(parse_status_line("  Apply all migrations: orders"), None);
        assert_eq!(parse_status_line(""), None);
    }

    #[test]
    fn test_indented_line_matches_after_trim() {
        assert!(parsed("  Applying orders.0002_add_index... OK").ok);
    }

    #[test]
    fn test_ansi_escaped_line_parses_like_plain() {
        let colored = "\x1b[32mApplying orders.0002_add_index...\x1b[0m OK";
        assert_eq!(parsed(colored), parsed("Applying orders.0002_add_index... OK"));
    }

    #[test]
    fn test_strip_ansi_removes_color_codes() {
        assert_eq!(strip_ansi("\x1b[31;1mApplying\x1b[0m x"), "Applying x");
        assert_eq!(strip_ansi("\u{9b}32mtext"), "text");
    }

    #[test]
    fn test_scan_preserves_emission_order() {
        let output = "Operations to perform:\n\
                      Running migrations:\n\
                      \x20 Applying orders.0001_initial... OK\n\
                      \x20 Applying orders.0002_add_index...\n\
                      Traceback (most recent call last):\n";
        let lines: Vec<_> = scan_status_lines(output).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ok);
        assert!(!lines[1].ok);
        assert_eq!(lines[1].migration, "0002_add_index");
    }
}
