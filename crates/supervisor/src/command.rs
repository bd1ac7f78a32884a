use std::ffi::CString;
use std::fmt;

use crate::error::{Result, SupervisorError};

/// Interpreter used by [`CommandSpec::shell`].
const SHELL: &str = "/bin/sh";

/// Program name followed by its arguments.
///
/// Always non-empty. Element 0 is resolved through `PATH` by `execvp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            return Err(SupervisorError::InvalidCommand("no command specified".into()));
        }
        if let Some(arg) = argv.iter().find(|a| a.contains('\0')) {
            return Err(SupervisorError::InvalidCommand(format!(
                "argument contains a NUL byte: {}",
                quote_for_display(arg)
            )));
        }
        Ok(Self { argv })
    }

    /// Run `script` through `/bin/sh -c`.
    pub fn shell(script: &str) -> Result<Self> {
        Self::new([SHELL, "-c", script])
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Argument vector as C strings, ready for `execvp`.
    pub(crate) fn to_c_argv(&self) -> Result<Vec<CString>> {
        self.argv
            .iter()
            .map(|a| {
                CString::new(a.as_str())
                    .map_err(|e| SupervisorError::InvalidCommand(format!("{a:?}: {e}")))
            })
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.argv.iter().map(|a| quote_for_display(a)).collect();
        f.write_str(&parts.join(" "))
    }
}

fn quote_for_display(s: &str) -> String {
    // Not a shell-accurate escaper; just makes spaces/specials unambiguous in logs.
    let needs_quotes =
        s.is_empty() || s.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\\'));
    if !needs_quotes {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_argv() {
        let err = CommandSpec::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidCommand(_)), "got: {err}");
    }

    #[test]
    fn new_rejects_interior_nul() {
        let err = CommandSpec::new(["echo", "a\0b"]).unwrap_err();
        assert!(err.to_string().contains("NUL"), "got: {err}");
    }

    #[test]
    fn program_is_first_element() {
        let cmd = CommandSpec::new(["sleep", "10"]).unwrap();
        assert_eq!(cmd.program(), "sleep");
        assert_eq!(cmd.argv(), ["sleep", "10"]);
    }

    #[test]
    fn shell_wraps_script() {
        let cmd = CommandSpec::shell("exit 3").unwrap();
        assert_eq!(cmd.argv(), ["/bin/sh", "-c", "exit 3"]);
    }

    #[test]
    fn display_quotes_args_with_spaces() {
        let cmd = CommandSpec::new(["sh", "-c", "echo \"hi\""]).unwrap();
        assert_eq!(cmd.to_string(), r#"sh -c "echo \"hi\"""#);
    }

    #[test]
    fn display_marks_empty_args() {
        let cmd = CommandSpec::new(["printf", ""]).unwrap();
        assert_eq!(cmd.to_string(), r#"printf """#);
    }

    #[test]
    fn c_argv_preserves_order() {
        let cmd = CommandSpec::new(["ls", "-l", "/tmp"]).unwrap();
        let argv = cmd.to_c_argv().unwrap();
        let back: Vec<&str> = argv.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(back, ["ls", "-l", "/tmp"]);
    }
}
