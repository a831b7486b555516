//! Host shell selection and executable lookup

use std::path::{Path, PathBuf};

/// The shell that interprets free-form command lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostShell {
    pub program: String,
    pub arg: &'static str,
}

impl HostShell {
    /// Pick the shell for the current platform.
    ///
    /// - Windows: `cmd /C`
    /// - Unix-like: `sh -c`. `$SHELL` is ignored: service accounts often carry
    ///   `nologin` there, and interactive shell config must not change output.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self {
                program: "cmd".into(),
                arg: "/C",
            }
        } else {
            Self::posix()
        }
    }

    /// POSIX `sh`, independent of the user's login shell.
    pub fn posix() -> Self {
        Self {
            program: "sh".into(),
            arg: "-c",
        }
    }
}

/// Resolve an executable by name.
///
/// Absolute paths must point at a file; bare names are looked up on the
/// process PATH via `which`.
pub async fn resolve_executable_path(executable: &str) -> Option<PathBuf> {
    if executable.trim().is_empty() {
        return None;
    }

    let path = Path::new(executable);
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }

    let executable = executable.to_string();
    tokio::task::spawn_blocking(move || which::which(executable))
        .await
        .ok()
        .and_then(|result| result.ok())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn posix_shell_uses_dash_c() {
        let shell = HostShell::posix();
        assert_eq!(shell.program, "sh");
        assert_eq!(shell.arg, "-c");
    }

    #[test]
    fn detected_shell_ignores_login_shell() {
        // whatever $SHELL holds (zsh, fish, /usr/sbin/nologin), commands go
        // through sh
        assert_eq!(HostShell::detect(), HostShell::posix());
    }

    #[tokio::test]
    async fn resolves_absolute_file_paths() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("kubectl");
        std::fs::write(&fake, "#!/bin/sh\n").unwrap();

        let resolved = resolve_executable_path(fake.to_str().unwrap()).await;
        assert_eq!(resolved, Some(fake));
    }

    #[tokio::test]
    async fn missing_absolute_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("kubectl");
        assert_eq!(resolve_executable_path(missing.to_str().unwrap()).await, None);
    }

    #[tokio::test]
    async fn blank_name_is_none() {
        assert_eq!(resolve_executable_path("  ").await, None);
    }

    #[tokio::test]
    async fn finds_sh_on_path() {
        assert!(resolve_executable_path("sh").await.is_some());
    }

    #[tokio::test]
    async fn unknown_name_is_none() {
        assert_eq!(
            resolve_executable_path("kubectl-definitely-not-installed").await,
            None
        );
    }
}
