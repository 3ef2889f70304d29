use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use apigen_core::GeneratedFile;
use log::{debug, info};

/// Rendered files of one target, not yet on disk.
#[derive(Debug)]
pub struct TargetOutput {
    pub dir: PathBuf,
    pub files: Vec<GeneratedFile>,
}

/// Write every target through a staging directory.
///
/// Targets are applied in order, one at a time. Each target directory is
/// replaced only after its own staging copy is complete, but the run as a
/// whole is not atomic: when a later target fails, targets already applied
/// keep their new contents and the failing target keeps its old ones.
pub fn apply(outputs: &[TargetOutput]) -> Result<()> {
    for output in outputs {
        apply_target(output)?;
    }
    Ok(())
}

fn apply_target(output: &TargetOutput) -> Result<()> {
    let staging = sibling(&output.dir, "staging")?;
    let previous = sibling(&output.dir, "old")?;
    remove_dir_if_exists(&staging)?;
    remove_dir_if_exists(&previous)?;

    write_files(&staging, &output.files)?;

    if output.dir.exists() {
        fs::rename(&output.dir, &previous).with_context(|| {
            format!("failed to move aside {}", output.dir.display())
        })?;
    }
    fs::rename(&staging, &output.dir)
        .with_context(|| format!("failed to move {} into place", staging.display()))?;
    remove_dir_if_exists(&previous)?;

    info!("wrote {} files to {}", output.files.len(), output.dir.display());
    Ok(())
}

/// `<parent>/.<name>.<suffix>` next to `dir`.
fn sibling(dir: &Path, suffix: &str) -> Result<PathBuf> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("output directory {} has no name", dir.display()))?;
    let parent = dir.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create directory {}", parent.display()))?;
    Ok(parent.join(format!(".{name}.{suffix}")))
}

fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("failed to remove {}", dir.display()))?;
    }
    Ok(())
}

fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    fs::create_dir_all(base)
        .with_context(|| format!("failed to create directory {}", base.display()))?;
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!("staged {}", path.display());
    }
    Ok(())
}
