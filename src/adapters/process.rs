use crate::domain::model::{Invocation, RunStatus};
use crate::domain::ports::{ExecutableResolver, ProcessRunner};
use crate::utils::error::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Spawns the child with inherited stdio and waits for it.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        tracing::info!(
            "Running {} {}",
            invocation.program,
            invocation.args.join(" ")
        );

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .await?;

        tracing::debug!("{} exited with {}", invocation.program, status);
        Ok(RunStatus {
            code: status_code(&status),
        })
    }
}

#[cfg(unix)]
fn status_code(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    // shells report death by signal N as 128 + N
    status.code().or_else(|| status.signal().map(|signal| 128 + signal))
}

#[cfg(not(unix))]
fn status_code(status: &std::process::ExitStatus) -> Option<i32> {
    status.code()
}

/// Looks executables up in a `PATH`-style list of directories.
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    search_path: Option<OsString>,
}

impl SearchPathResolver {
    pub fn new(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }
}

impl ExecutableResolver for SearchPathResolver {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.contains(std::path::MAIN_SEPARATOR) {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }

        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| candidates(&dir, name))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name), dir.join(format!("{}.exe", name))]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
