//! Turning dashboard input into something a process can be spawned from

use std::{fmt, process::Stdio};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tokio::process::Command;
use utils::shell::HostShell;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Enter a kubectl command before running.")]
    EmptyCommand,
    #[error("unterminated quote in command")]
    UnterminatedQuote,
    #[error("`{0}` is not an allowed kubectl command")]
    SubcommandNotAllowed(String),
}

/// How free-form input reaches the operating system.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExecutionMode {
    /// The whole line goes through the host shell. Pipes, `;` and redirects
    /// are interpreted, so anyone who can submit input can run anything.
    #[default]
    Shell,
    /// kubectl is spawned directly with an argument vector and the first word
    /// must be a known subcommand.
    Restricted,
}

/// Decides which leading subcommands restricted mode accepts.
pub trait SubcommandPolicy: Send + Sync {
    fn allows(&self, subcommand: &str) -> bool;
}

/// A fully assembled command, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandLine {
    Shell { line: String },
    Direct { program: String, args: Vec<String> },
}

impl CommandLine {
    pub fn program(&self) -> &str {
        match self {
            CommandLine::Shell { line } => line.split_whitespace().next().unwrap_or(""),
            CommandLine::Direct { program, .. } => program,
        }
    }

    pub(crate) fn to_command(&self, shell: &HostShell) -> Command {
        let mut command = match self {
            CommandLine::Shell { line } => {
                let mut command = Command::new(&shell.program);
                command.arg(shell.arg).arg(line);
                command
            }
            CommandLine::Direct { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            }
        };
        command
            .kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Shell { line } => f.write_str(line),
            CommandLine::Direct { program, args } => {
                f.write_str(&shell_quote(program))?;
                for arg in args {
                    write!(f, " {}", shell_quote(arg))?;
                }
                Ok(())
            }
        }
    }
}

/// Builds kubectl command lines in the configured mode.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: String,
    mode: ExecutionMode,
}

impl Kubectl {
    pub fn new(program: impl Into<String>, mode: ExecutionMode) -> Self {
        Self {
            program: program.into(),
            mode,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// The text prepended to free-form input, e.g. `"kubectl "`.
    ///
    /// The configured program is inserted as written, so in shell mode it may
    /// itself be a command line such as `sudo -u ops kubectl`.
    pub fn prefix(&self) -> String {
        format!("{} ", self.program)
    }

    /// Assemble a command from text typed by the user.
    ///
    /// In shell mode the input is appended to the prefix verbatim.
    pub fn user_command(
        &self,
        input: &str,
        policy: &dyn SubcommandPolicy,
    ) -> Result<CommandLine, CommandError> {
        if input.trim().is_empty() {
            return Err(CommandError::EmptyCommand);
        }

        match self.mode {
            ExecutionMode::Shell => Ok(CommandLine::Shell {
                line: format!("{}{}", self.prefix(), input),
            }),
            ExecutionMode::Restricted => {
                let args = split_words(input)?;
                let subcommand = args.first().ok_or(CommandError::EmptyCommand)?;
                if !policy.allows(subcommand) {
                    return Err(CommandError::SubcommandNotAllowed(subcommand.clone()));
                }
                Ok(CommandLine::Direct {
                    program: self.program.clone(),
                    args,
                })
            }
        }
    }

    /// A command whose arguments are fixed by the dashboard itself.
    pub fn fixed(&self, args: &[&str]) -> CommandLine {
        match self.mode {
            ExecutionMode::Shell => {
                let mut line = self.program.clone();
                for arg in args {
                    line.push(' ');
                    line.push_str(&shell_quote(arg));
                }
                CommandLine::Shell { line }
            }
            ExecutionMode::Restricted => CommandLine::Direct {
                program: self.program.clone(),
                args: args.iter().map(|arg| arg.to_string()).collect(),
            },
        }
    }
}

/// Split a line into words using POSIX-style quoting.
///
/// Single quotes are literal, double quotes allow backslash escapes, and
/// nothing is expanded. Operators such as `;` or `|` are ordinary characters.
pub fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Normal,
        SingleQuoted,
        DoubleQuoted,
    }

    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut mode = Mode::Normal;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match mode {
            Mode::Normal => match ch {
                '\'' => {
                    mode = Mode::SingleQuoted;
                    in_word = true;
                }
                '"' => {
                    mode = Mode::DoubleQuoted;
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
            Mode::SingleQuoted => match ch {
                '\'' => mode = Mode::Normal,
                c => current.push(c),
            },
            Mode::DoubleQuoted => match ch {
                '"' => mode = Mode::Normal,
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                c => current.push(c),
            },
        }
    }

    if mode != Mode::Normal {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    if words.is_empty() {
        return Err(CommandError::EmptyCommand);
    }
    Ok(words)
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlyGet;

    impl SubcommandPolicy for OnlyGet {
        fn allows(&self, subcommand: &str) -> bool {
            subcommand == "get"
        }
    }

    #[test]
    fn shell_mode_appends_input_to_prefix() {
        let kubectl = Kubectl::new("kubectl", ExecutionMode::Shell);
        let line = kubectl.user_command("get nodes", &OnlyGet).unwrap();
        assert_eq!(
            line,
            CommandLine::Shell {
                line: "kubectl get nodes".into()
            }
        );
    }

    #[test]
    fn shell_mode_does_not_check_the_subcommand() {
        let kubectl = Kubectl::new("kubectl", ExecutionMode::Shell);
        let line = kubectl
            .user_command("delete pod web; echo INJECTED", &OnlyGet)
            .unwrap();
        assert_eq!(line.to_string(), "kubectl delete pod web; echo INJECTED");
    }

    #[test]
    fn blank_input_is_rejected_in_both_modes() {
        for mode in [ExecutionMode::Shell, ExecutionMode::Restricted] {
            let kubectl = Kubectl::new("kubectl", mode);
            assert_eq!(
                kubectl.user_command("   ", &OnlyGet),
                Err(CommandError::EmptyCommand)
            );
        }
    }

    #[test]
    fn restricted_mode_builds_an_argument_vector() {
        let kubectl = Kubectl::new("kubectl", ExecutionMode::Restricted);
        let line = kubectl
            .user_command("get pods -l 'app=web tier' ; rm -rf /", &OnlyGet)
            .unwrap();
        assert_eq!(
            line,
            CommandLine::Direct {
                program: "kubectl".into(),
                args: vec![
                    "get".into(),
                    "pods".into(),
                    "-l".into(),
                    "app=web tier".into(),
                    ";".into(),
                    "rm".into(),
                    "-rf".into(),
                    "/".into(),
                ],
            }
        );
    }

    #[test]
    fn restricted_mode_rejects_unknown_subcommands() {
        let kubectl = Kubectl::new("kubectl", ExecutionMode::Restricted);
        assert_eq!(
            kubectl.user_command("delete ns prod", &OnlyGet),
            Err(CommandError::SubcommandNotAllowed("delete".into()))
        );
    }

    #[test]
    fn fixed_commands_follow_the_mode() {
        let shell = Kubectl::new("kubectl", ExecutionMode::Shell);
        assert_eq!(shell.fixed(&["get", "svc", "-A"]).to_string(), "kubectl get svc -A");

        let restricted = Kubectl::new("kubectl", ExecutionMode::Restricted);
        assert_eq!(
            restricted.fixed(&["get", "--help"]),
            CommandLine::Direct {
                program: "kubectl".into(),
                args: vec!["get".into(), "--help".into()],
            }
        );
    }

    #[test]
    fn shell_prefix_is_inserted_as_written() {
        let kubectl = Kubectl::new("sudo -u ops kubectl", ExecutionMode::Shell);
        assert_eq!(kubectl.prefix(), "sudo -u ops kubectl ");
        assert_eq!(
            kubectl.fixed(&["get", "ns"]).to_string(),
            "sudo -u ops kubectl get ns"
        );
    }

    #[test]
    fn direct_commands_display_with_quoting() {
        let line = CommandLine::Direct {
            program: "kubectl".into(),
            args: vec!["get".into(), "pods".into(), "-l".into(), "app=web tier".into()],
        };
        assert_eq!(line.to_string(), "kubectl get pods -l 'app=web tier'");
    }

    #[test]
    fn split_handles_quotes_and_escapes() {
        assert_eq!(
            split_words(r#"logs "my pod" 'a b' c\ d """#).unwrap(),
            vec!["logs", "my pod", "a b", "c d", ""]
        );
        assert_eq!(split_words("get 'oops"), Err(CommandError::UnterminatedQuote));
        assert_eq!(split_words(" \t "), Err(CommandError::EmptyCommand));
    }

    #[test]
    fn mode_parses_from_config_strings() {
        assert_eq!("shell".parse::<ExecutionMode>().unwrap(), ExecutionMode::Shell);
        assert_eq!(
            "Restricted".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Restricted
        );
        assert!("sandbox".parse::<ExecutionMode>().is_err());
        assert_eq!(ExecutionMode::Restricted.to_string(), "restricted");
    }
}
