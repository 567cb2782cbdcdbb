//! Brings generated files onto disk, or shows what would change.
//!
//! Every file is first written to a `.bak` sibling of its destination. In
//! execute mode that sibling is renamed over the destination; in dry-run mode
//! it is diffed against the destination and removed again. A dry run whose
//! destination directory does not exist yet diffs against a file in the
//! system temp directory instead, so it never creates anything in the tree.
//! Earlier files are never rolled back when a later one fails.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use crate::codegen::GeneratedFile;
use crate::config::{Config, Mode};
use crate::error::{AliasError, Result};

const DIFF_PROGRAM: &str = "diff";

/// Strip the module root from a generated name. The remainder must stay
/// below the root: no `..`, no absolute components.
pub fn relative_path(module_root: &Path, name: &str) -> Result<PathBuf> {
    let outside = || AliasError::OutsideRoot {
        name: name.to_string(),
        root: module_root.display().to_string(),
    };
    let rel = Path::new(name)
        .strip_prefix(module_root)
        .map_err(|_| outside())?;
    let below_root = rel
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if rel.as_os_str().is_empty() || !below_root {
        return Err(outside());
    }
    Ok(rel.to_path_buf())
}

fn temp_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// A `.bak` file that is removed on drop unless persisted. Removal errors
/// are ignored.
struct TempFile {
    path: PathBuf,
    keep: bool,
}

impl TempFile {
    fn create(path: PathBuf, content: &str) -> Result<Self> {
        fs::write(&path, content).map_err(|e| AliasError::io(&path, e))?;
        Ok(Self { path, keep: false })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn persist(mut self, dest: &Path) -> Result<()> {
        fs::rename(&self.path, dest).map_err(|e| AliasError::io(dest, e))?;
        self.keep = true;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_file(&self.path);
        }
    }
}

pub fn reconcile(config: &Config, files: &[GeneratedFile], out: &mut dyn Write) -> Result<()> {
    for file in files {
        reconcile_file(config, file, out)?;
    }
    Ok(())
}

pub fn reconcile_file(config: &Config, file: &GeneratedFile, out: &mut dyn Write) -> Result<()> {
    let rel = relative_path(&config.module_root, &file.name)?;
    let dest = config.out_dir.join(&rel);

    match config.mode {
        Mode::Execute => {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| AliasError::io(parent, e))?;
            }
            let temp = TempFile::create(temp_path(&dest), &file.content)?;
            writeln!(out, "# {}", rel.display()).map_err(|e| AliasError::io(&dest, e))?;
            temp.persist(&dest)?;
            tracing::info!("wrote {}", dest.display());
        }
        Mode::DryRun if dest.parent().is_some_and(Path::is_dir) => {
            let temp = TempFile::create(temp_path(&dest), &file.content)?;
            diff(DIFF_PROGRAM, &dest, temp.path(), out);
            tracing::debug!("diffed {}", dest.display());
        }
        Mode::DryRun => {
            // Nothing exists at the destination yet.
            let temp_dir = std::env::temp_dir();
            let mut temp = tempfile::Builder::new()
                .prefix("protocrap-alias-")
                .suffix(".bak")
                .tempfile_in(&temp_dir)
                .map_err(|e| AliasError::io(&temp_dir, e))?;
            temp.write_all(file.content.as_bytes())
                .map_err(|e| AliasError::io(temp.path(), e))?;
            diff(DIFF_PROGRAM, &dest, temp.path(), out);
            tracing::debug!("diffed new file {}", dest.display());
        }
    }
    Ok(())
}

/// `diff -N -u`, output forwarded to `out`. Failures only warn.
fn diff(program: &str, dest: &Path, temp: &Path, out: &mut dyn Write) {
    let output = match Command::new(program)
        .arg(dest)
        .arg(temp)
        .args(["-N", "-u"])
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!("could not run diff for {}: {}", dest.display(), e);
            return;
        }
    };

    if let Err(e) = out.write_all(&output.stdout) {
        tracing::warn!("could not forward diff for {}: {}", dest.display(), e);
    }
    // 0: same, 1: different, anything else: trouble.
    if !matches!(output.status.code(), Some(0 | 1)) {
        tracing::warn!(
            "diff for {} exited with {}: {}",
            dest.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
}
