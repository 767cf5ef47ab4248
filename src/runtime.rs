//! Execution handoff: save, build the bridge file, launch the runtime.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use crate::bridge::{Fetcher, build_bridge};
use crate::config::Settings;
use crate::editor::Editor;
use crate::error::{Error, Result};

/// Save the script and write the bridge file next to the runtime.
///
/// Returns the absolute script path to hand to the runtime. Nothing is
/// launched if saving or writing the bridge file fails.
pub async fn prepare(editor: &mut Editor, settings: &Settings) -> Result<PathBuf> {
    editor.save()?;
    let script = match editor.buffer.path() {
        Some(path) => std::path::absolute(path)?,
        None => return Err(Error::NoFilePath),
    };

    let fetcher = Fetcher::from_settings(settings)?;
    let bridge = settings.bridge_path();
    let records = build_bridge(&editor.buffer.text(), &fetcher, &bridge).await?;
    tracing::info!(script = %script.display(), records = records.len(), "script prepared");
    Ok(script)
}

/// The configured runtime command with the script as its last argument
pub fn command(settings: &Settings, script: &Path) -> Result<Command> {
    let (program, args) = settings
        .runtime_command
        .split_first()
        .ok_or(Error::EmptyRuntimeCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(args).arg(script).current_dir(settings.runtime_dir());
    Ok(cmd)
}

/// Run the runtime attached to the terminal and wait for it to exit
pub async fn run(settings: &Settings, script: &Path) -> Result<ExitStatus> {
    let mut cmd = command(settings, script)?;
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    tracing::info!(command = ?settings.runtime_command, script = %script.display(), "launching runtime");
    let mut child = cmd.spawn().map_err(|source| Error::RuntimeLaunch {
        command: settings.runtime_command.join(" "),
        source,
    })?;
    let status = child.wait().await?;
    tracing::info!(%status, "runtime exited");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn settings_in(dir: &Path, command: &[&str]) -> Settings {
        Settings {
            runtime_command: command.iter().map(|s| s.to_string()).collect(),
            runtime_dir: Some(dir.to_path_buf()),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn prepare_requires_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = Editor::new();
        let err = prepare(&mut editor, &settings_in(dir.path(), &["true"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoFilePath));
    }

    #[tokio::test]
    async fn prepare_saves_without_bridge_for_plain_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("main.rs1");
        fs::write(&script, "mostrar(1)\n").unwrap();
        let settings = settings_in(dir.path(), &["true"]);

        let mut editor = Editor::open(script.clone()).unwrap();
        let prepared = prepare(&mut editor, &settings).await.unwrap();

        assert_eq!(prepared, script);
        assert!(!editor.buffer.is_dirty());
        assert!(!settings.bridge_path().exists());
    }

    #[tokio::test]
    async fn prepare_fails_when_bridge_cannot_be_written() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("main.rs1");
        fs::write(&script, "web.leer(\"http://127.0.0.1:1/\", \"0\", \"x\")\n").unwrap();
        let settings = settings_in(&dir.path().join("missing"), &["true"]);

        let mut editor = Editor::open(script).unwrap();
        let err = prepare(&mut editor, &settings).await.unwrap_err();

        assert!(matches!(err, Error::BridgeWrite { .. }));
    }

    #[test]
    fn empty_command_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = command(&settings_in(dir.path(), &[]), Path::new("a.rs1")).unwrap_err();
        assert!(matches!(err, Error::EmptyRuntimeCommand));
    }

    #[test]
    fn script_is_the_last_argument() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = command(&settings_in(dir.path(), &["RedCore", "--quiet"]), Path::new("a.rs1"))
            .unwrap();
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "RedCore");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, ["--quiet", "a.rs1"]);
        assert_eq!(std_cmd.get_current_dir(), Some(dir.path()));
    }

    #[tokio::test]
    async fn missing_runtime_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), &["redcore-does-not-exist"]);
        let err = run(&settings, Path::new("a.rs1")).await.unwrap_err();
        assert!(matches!(err, Error::RuntimeLaunch { .. }));
    }
}
