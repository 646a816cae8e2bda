use std::borrow::Cow;
use std::fmt;
use std::process::Command;

/// A single `sh -c` command line where every word is quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLine {
    line: String,
}

impl ShellLine {
    pub fn new(program: &str) -> Self {
        let mut line = String::with_capacity(256);
        line.push_str(&quote(program));
        Self { line }
    }

    /// Append one quoted word.
    pub fn arg(&mut self, word: &str) -> &mut Self {
        self.line.push(' ');
        self.line.push_str(&quote(word));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// A `Command` that runs this line through the shell.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new("/usr/bin/env");
        cmd.arg("sh").arg("-c").arg(&self.line);
        cmd
    }
}

impl fmt::Display for ShellLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Quote `word` for a POSIX shell. Words made only of safe characters are left bare.
pub fn quote(word: &str) -> Cow<'_, str> {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c);
    if !word.is_empty() && word.chars().all(is_safe) {
        return Cow::Borrowed(word);
    }
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('\'');
    for c in word.chars() {
        if c == '\'' {
            // close, escaped quote, reopen:
            quoted.push_str("'\"'\"'");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    Cow::Owned(quoted)
}
