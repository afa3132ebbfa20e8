// Per-invocation scratch directory management.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::warn;

/// Assembled translation unit.
pub const SOURCE_FILE: &str = "submission.cpp";
/// Compiled artifact, produced by the compile step.
pub const BINARY_FILE: &str = "submission.out";
/// Current test case's stdin, overwritten per case.
pub const INPUT_FILE: &str = "input.txt";
/// Current test case's captured stdout, overwritten per case.
pub const OUTPUT_FILE: &str = "output.txt";
/// Current test case's expected output, overwritten per case.
pub const EXPECTED_FILE: &str = "expected.txt";

/// An exclusively owned scratch directory for one judge invocation.
///
/// Holds the assembled source, the compiled binary and the transient
/// per-test input/output/expected files. Exactly one invocation sees a
/// given workspace; the orchestrator owns its lifetime and is the only
/// component that releases it. If an invocation aborts without an explicit
/// `release`, the backing `TempDir` still removes the tree on drop.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a uniquely named, empty workspace under the system temp
    /// directory. Failure here is fatal for the invocation.
    pub fn acquire() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("submission_").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_source(&self, unit: &str) -> io::Result<()> {
        fs::write(self.file(SOURCE_FILE), unit)
    }

    pub fn write_input(&self, input: &str) -> io::Result<()> {
        fs::write(self.file(INPUT_FILE), input)
    }

    pub fn write_expected(&self, expected: &str) -> io::Result<()> {
        fs::write(self.file(EXPECTED_FILE), expected)
    }

    pub fn read_output(&self) -> io::Result<String> {
        fs::read_to_string(self.file(OUTPUT_FILE))
    }

    pub fn read_expected(&self) -> io::Result<String> {
        fs::read_to_string(self.file(EXPECTED_FILE))
    }

    /// Remove the workspace and everything under it, partial artifacts
    /// included. Removal failure is logged, never escalated: it must not
    /// block returning a result to the caller.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!(path = %path.display(), error = %e, "failed to remove workspace");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_creates_unique_empty_directories() {
        let a = Workspace::acquire().unwrap();
        let b = Workspace::acquire().unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        assert!(fs::read_dir(a.path()).unwrap().next().is_none());

        a.release();
        b.release();
    }

    #[test]
    fn release_removes_everything_including_partial_artifacts() {
        let ws = Workspace::acquire().unwrap();
        let path = ws.path().to_path_buf();

        ws.write_source("int main() {}").unwrap();
        ws.write_input("1 2").unwrap();
        ws.write_expected("3").unwrap();
        fs::write(path.join(BINARY_FILE), b"\x7fELF").unwrap();

        ws.release();
        assert!(!path.exists());
    }

    #[test]
    fn dropping_an_unreleased_workspace_still_cleans_up() {
        let path = {
            let ws = Workspace::acquire().unwrap();
            ws.write_input("abandoned").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn per_test_files_are_overwritten_not_appended() {
        let ws = Workspace::acquire().unwrap();

        ws.write_input("first, long enough to notice leftovers").unwrap();
        ws.write_input("second").unwrap();
        let input = fs::read_to_string(ws.path().join(INPUT_FILE)).unwrap();
        assert_eq!(input, "second");

        ws.write_expected("old").unwrap();
        ws.write_expected("new").unwrap();
        assert_eq!(ws.read_expected().unwrap(), "new");

        ws.release();
    }
}
