#![cfg(unix)]

use anyhow::Result;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A PATH directory holding stand-ins for the tournament runner and engine.
struct FakeTools {
    bin_dir: TempDir,
    args_log: PathBuf,
}

impl FakeTools {
    fn new(runner_exit_code: i32) -> Result<Self> {
        let bin_dir = TempDir::new()?;
        let args_log = bin_dir.path().join("runner-args.txt");

        write_executable(
            bin_dir.path(),
            "cutechess-cli",
            &format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nexit {}\n",
                args_log.display(),
                runner_exit_code
            ),
        )?;
        write_executable(bin_dir.path(), "stockfish", "#!/bin/sh\nexit 0\n")?;

        Ok(Self { bin_dir, args_log })
    }

    fn without(self, name: &str) -> Result<Self> {
        std::fs::remove_file(self.bin_dir.path().join(name))?;
        Ok(self)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Ok(Command::new(env!("CARGO_BIN_EXE_run_tournament"))
            .args(args)
            .env("PATH", self.bin_dir.path())
            .env_remove("RUST_LOG")
            .output()?)
    }

    fn runner_args(&self) -> Option<Vec<String>> {
        std::fs::read_to_string(&self.args_log)
            .ok()
            .map(|content| content.lines().map(str::to_string).collect())
    }
}

fn write_executable(dir: &Path, name: &str, body: &str) -> Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, body)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

fn value_after(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .cloned()
}

#[test]
fn test_runner_receives_rounds_and_output() -> Result<()> {
    let tools = FakeTools::new(0)?;
    let out_dir = TempDir::new()?;
    let pgn_out = out_dir.path().join("games.pgn").to_string_lossy().into_owned();

    let output = tools.run(&["-r", "7", &pgn_out])?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let args = tools.runner_args().expect("runner was called");
    assert_eq!(value_after(&args, "-rounds").as_deref(), Some("7"));
    assert_eq!(value_after(&args, "-pgnout").as_deref(), Some(pgn_out.as_str()));
    assert_eq!(value_after(&args, "-concurrency").as_deref(), Some("1"));
    assert!(args.iter().any(|arg| arg.ends_with("openings.pgn")));
    Ok(())
}

#[test]
fn test_default_is_ten_rounds() -> Result<()> {
    let tools = FakeTools::new(0)?;
    let out_dir = TempDir::new()?;
    let pgn_out = out_dir.path().join("games.pgn").to_string_lossy().into_owned();

    tools.run(&[&pgn_out])?;

    let args = tools.runner_args().expect("runner was called");
    assert_eq!(value_after(&args, "-rounds").as_deref(), Some("10"));
    Ok(())
}

#[test]
fn test_runner_exit_status_is_mirrored() -> Result<()> {
    let tools = FakeTools::new(3)?;
    let out_dir = TempDir::new()?;
    let pgn_out = out_dir.path().join("games.pgn").to_string_lossy().into_owned();

    let output = tools.run(&[&pgn_out])?;

    assert_eq!(output.status.code(), Some(3));
    Ok(())
}

#[test]
fn test_existing_output_is_refused() -> Result<()> {
    let tools = FakeTools::new(0)?;
    let out_dir = TempDir::new()?;
    let pgn_path = out_dir.path().join("games.pgn");
    std::fs::write(&pgn_path, "keep me")?;
    let pgn_out = pgn_path.to_string_lossy().into_owned();

    let output = tools.run(&["-r", "2", &pgn_out])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert!(tools.runner_args().is_none());
    assert_eq!(std::fs::read_to_string(&pgn_path)?, "keep me");
    Ok(())
}

#[test]
fn test_missing_engine_stops_before_anything_runs() -> Result<()> {
    let tools = FakeTools::new(0)?.without("stockfish")?;
    let out_dir = TempDir::new()?;
    let pgn_out = out_dir.path().join("games.pgn").to_string_lossy().into_owned();

    let output = tools.run(&[&pgn_out])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("stockfish"));
    assert!(tools.runner_args().is_none());
    Ok(())
}

#[test]
fn test_missing_runner_is_reported() -> Result<()> {
    let tools = FakeTools::new(0)?.without("cutechess-cli")?;
    let out_dir = TempDir::new()?;
    let pgn_out = out_dir.path().join("games.pgn").to_string_lossy().into_owned();

    let output = tools.run(&[&pgn_out])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cutechess-cli"));
    Ok(())
}

#[test]
fn test_usage_errors_never_spawn() -> Result<()> {
    let tools = FakeTools::new(0)?;

    for args in [
        vec![],
        vec!["a.pgn", "b.pgn"],
        vec!["-x", "a.pgn"],
        vec!["-r", "0", "a.pgn"],
    ] {
        let output = tools.run(&args)?;
        assert_eq!(output.status.code(), Some(2), "args: {:?}", args);
        assert!(tools.runner_args().is_none());
    }
    Ok(())
}
