//! Shared test utilities: stand-in encoder/cleaner scripts and fixtures
//!
//! The scripts follow the real tools' contracts closely enough for the
//! pipeline: the encoder writes its last argument, the cleaner writes
//! `clean.<name>` next to its last argument. Both append to `calls.log` in the
//! working directory of the file they touch.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use tempfile::TempDir;

/// Encoder stand-in. Fails for inputs whose name contains `FAIL`.
const ENCODER: &str = r#"#!/bin/sh
for arg in "$@"; do out="$arg"; done
echo "encode $2" >> "$(dirname "$out")/calls.log"
case "$2" in
  *FAIL*) echo "encoder exploded" >&2; exit 1 ;;
esac
printf 'frame=1\rframe=2\n' >&2
printf 'encoded' > "$out"
"#;

/// Cleaner stand-in that writes `clean.<name>` beside the target.
/// Exits 3 for targets whose name contains `BADCLEAN`.
const CLEANER: &str = r#"#!/bin/sh
for arg in "$@"; do target="$arg"; done
dir=$(dirname "$target")
name=$(basename "$target")
echo "clean $target" >> "$dir/calls.log"
case "$name" in
  *BADCLEAN*) echo "cleaner exploded" >&2; exit 3 ;;
esac
{ printf 'cleaned+'; cat "$target"; } > "$dir/clean.$name"
"#;

/// Cleaner stand-in that succeeds without producing anything.
const SILENT_CLEANER: &str = r#"#!/bin/sh
for arg in "$@"; do target="$arg"; done
echo "clean $target" >> "$(dirname "$target")/calls.log"
"#;

/// Cleaner stand-in that exits non-zero after printing a diagnostic.
const FAILING_CLEANER: &str = r#"#!/bin/sh
for arg in "$@"; do target="$arg"; done
echo "clean $target" >> "$(dirname "$target")/calls.log"
echo "cleaner exploded" >&2
exit 3
"#;

pub struct FakeTools {
    _dir: TempDir,
    pub encoder: PathBuf,
    pub cleaner: PathBuf,
    pub silent_cleaner: PathBuf,
    pub failing_cleaner: PathBuf,
}

/// Scripts are written once per test binary and shared by every test.
pub fn fake_tools() -> &'static FakeTools {
    static TOOLS: OnceLock<FakeTools> = OnceLock::new();
    TOOLS.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let encoder = write_script(dir.path(), "fake-ffmpeg", ENCODER);
        let cleaner = write_script(dir.path(), "fake-mkclean", CLEANER);
        let silent_cleaner = write_script(dir.path(), "silent-mkclean", SILENT_CLEANER);
        let failing_cleaner = write_script(dir.path(), "failing-mkclean", FAILING_CLEANER);
        FakeTools {
            _dir: dir,
            encoder,
            cleaner,
            silent_cleaner,
            failing_cleaner,
        }
    })
}

/// Write an executable script through a short-lived `sh` child.
///
/// The test process never holds a write handle on the script, so a fork
/// running on another test thread cannot inherit one and make exec fail with
/// ETXTBSY. The script is staged under a temp name and renamed into place.
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let staged = dir.join(format!(".{}.tmp", name));

    let mut child = Command::new("/bin/sh")
        .arg("-c")
        .arg(r#"cat > "$1""#)
        .arg("sh")
        .arg(&staged)
        .stdin(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(body.as_bytes()).unwrap();
    assert!(child.wait().unwrap().success());

    fs::set_permissions(&staged, fs::Permissions::from_mode(0o755)).unwrap();
    fs::rename(&staged, &path).unwrap();
    path
}

/// Create empty input files in a fresh directory
pub fn create_inputs(names: &[&str]) -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().unwrap();
    let paths = names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, b"raw video").unwrap();
            path
        })
        .collect();
    (dir, paths)
}

/// Lines the stand-in tools logged in `dir`, empty if none ran
pub fn tool_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn webm_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(".webm");
    PathBuf::from(path)
}

pub fn clean_path(input: &Path) -> PathBuf {
    let name = input.file_name().unwrap().to_string_lossy();
    input.with_file_name(format!("clean.{}.webm", name))
}
