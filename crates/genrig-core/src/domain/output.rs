//! Captured console output.
//!
//! The generator never writes to the real process streams while the harness
//! drives it: every invocation receives an explicit [`Stdio`] whose buffers
//! are read back afterwards.

use std::borrow::Cow;
use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;

/// `ESC [ <ASCII digits> m`
static COLOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9]+m").expect("colour code pattern is valid"));

/// In-memory standard streams handed to an operation.
#[derive(Debug, Default)]
pub struct Stdio {
    stdin: Cursor<Vec<u8>>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Stdio {
    /// Fresh streams; `input` (if any) becomes the readable stdin.
    pub fn new(input: Option<&str>) -> Self {
        Self {
            stdin: Cursor::new(input.map(|s| s.as_bytes().to_vec()).unwrap_or_default()),
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn stdin(&mut self) -> &mut Cursor<Vec<u8>> {
        &mut self.stdin
    }

    pub fn stdout(&mut self) -> &mut Vec<u8> {
        &mut self.stdout
    }

    pub fn stderr(&mut self) -> &mut Vec<u8> {
        &mut self.stderr
    }

    /// Drain whatever stdin has not been read yet.
    pub fn take_input(&mut self) -> Vec<u8> {
        let mut rest = Vec::new();
        // Reading from an in-memory cursor cannot fail.
        let _ = self.stdin.read_to_end(&mut rest);
        rest
    }

    pub fn into_output(self) -> CapturedOutput {
        CapturedOutput {
            stdout: String::from_utf8_lossy(&self.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
        }
    }
}

/// Text written to stdout and stderr during one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// Stdout followed by stderr, the form persisted to log files.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

/// Run `op` against fresh in-memory streams and return what it wrote.
///
/// ```
/// use std::io::Write;
/// use genrig_core::domain::capture_stdios;
///
/// let ((), out) = capture_stdios(None, |io| {
///     writeln!(io.stdout(), "created jobs/redis").unwrap();
///     writeln!(io.stderr(), "warning: no packages").unwrap();
/// });
/// assert_eq!(out.stdout, "created jobs/redis\n");
/// assert_eq!(out.stderr, "warning: no packages\n");
/// ```
pub fn capture_stdios<R>(input: Option<&str>, op: impl FnOnce(&mut Stdio) -> R) -> (R, CapturedOutput) {
    let mut stdio = Stdio::new(input);
    let result = op(&mut stdio);
    (result, stdio.into_output())
}

/// Remove ANSI colour escapes (`ESC [ digits m`).
pub fn strip_color_codes(text: &str) -> Cow<'_, str> {
    COLOR_CODE.replace_all(text, "")
}

/// Colour-free text with trailing whitespace removed.
pub fn normalize_output(text: &str) -> String {
    strip_color_codes(text).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Write};

    #[test]
    fn strips_green_ok() {
        assert_eq!(strip_color_codes("\x1b[32mOK\x1b[0m"), "OK");
    }

    #[test]
    fn leaves_plain_text_borrowed() {
        assert!(matches!(strip_color_codes("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn keeps_non_colour_escapes() {
        // Only the digits-then-m form is removed.
        assert_eq!(strip_color_codes("\x1b[1;32mX"), "\x1b[1;32mX");
    }

    #[test]
    fn only_ascii_digits_form_a_colour_code() {
        assert_eq!(strip_color_codes("\x1b[\u{663}mX"), "\x1b[\u{663}mX");
    }

    #[test]
    fn normalize_trims_trailing_whitespace_only() {
        assert_eq!(normalize_output("  \x1b[31mfail\x1b[0m\n\n"), "  fail");
    }

    #[test]
    fn combined_is_stdout_then_stderr() {
        let out = CapturedOutput {
            stdout: "a\n".into(),
            stderr: "b\n".into(),
        };
        assert_eq!(out.combined(), "a\nb\n");
    }

    #[test]
    fn input_is_readable() {
        let (line, _) = capture_stdios(Some("yes\n"), |io| {
            let mut line = String::new();
            io.stdin().read_line(&mut line).unwrap();
            line
        });
        assert_eq!(line, "yes\n");
    }

    #[test]
    fn take_input_returns_unread_rest() {
        let mut io = Stdio::new(Some("ab"));
        let mut first = [0u8; 1];
        io.stdin().read_exact(&mut first).unwrap();
        assert_eq!(io.take_input(), b"b");
    }

    #[test]
    fn panicking_operation_leaves_process_streams_alone() {
        let result = std::panic::catch_unwind(|| {
            capture_stdios(None, |io| {
                write!(io.stdout(), "partial").unwrap();
                panic!("generator blew up");
            })
        });
        assert!(result.is_err());
        // The real stdout is still usable.
        assert!(writeln!(std::io::stdout()).is_ok());
    }
}
