//! Local filesystem implementation of the `ArtifactFs` port.
//!
//! Staging is a plain recursive copy; the archive is a flat zip whose entry
//! names are paths relative to the staging directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::application::ports::ArtifactFs;
use crate::domain::packaging::STAGING_EXCLUDES;

const DEFAULT_FILE_MODE: u32 = 0o644;
const DEFAULT_DIR_MODE: u32 = 0o755;

/// Production `ArtifactFs` on the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalArtifactFs;

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("cannot resolve {}", path.display()))
}

/// Canonical form of a path that may not exist yet: its parent is resolved
/// and the file name re-attached.
fn canonical_target(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => parent
            .canonicalize()
            .map_or_else(|_| path.to_path_buf(), |p| p.join(name)),
        _ => std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path)),
    }
}

fn is_excluded(entry: &DirEntry, skip: &[PathBuf]) -> bool {
    skip.iter().any(|s| entry.path() == s)
        || entry
            .file_name()
            .to_str()
            .is_some_and(|name| STAGING_EXCLUDES.contains(&name))
}

/// Zip entry name: relative components joined with `/`.
fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn entry_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode)
}

#[cfg(unix)]
fn mode_of(meta: &fs::Metadata, _fallback: u32) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_of(_meta: &fs::Metadata, fallback: u32) -> u32 {
    fallback
}

impl ArtifactFs for LocalArtifactFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn prepare_staging(&self, dir: &Path) -> Result<()> {
        if dir.exists() {
            fs::remove_dir_all(dir)
                .with_context(|| format!("removing directory {}", dir.display()))?;
        }
        fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))
    }

    fn copy_source_tree(&self, source: &Path, staging: &Path, output: &Path) -> Result<()> {
        let source = canonical(source)?;
        let staging = canonical(staging)?;
        let skip = [staging.clone(), canonical_target(output)];

        let walker = WalkDir::new(&source)
            .min_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_excluded(e, &skip));

        let mut copied = 0_usize;
        for entry in walker {
            let entry = entry.with_context(|| format!("walking {}", source.display()))?;
            let rel = entry
                .path()
                .strip_prefix(&source)
                .with_context(|| format!("{} is outside the source tree", entry.path().display()))?;
            let dest = staging.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)
                    .with_context(|| format!("creating directory {}", dest.display()))?;
            } else {
                fs::copy(entry.path(), &dest).with_context(|| {
                    format!("copying {} to {}", entry.path().display(), dest.display())
                })?;
                copied += 1;
            }
        }
        debug!(files = copied, staging = %staging.display(), "source staged");
        Ok(())
    }

    fn write_archive(&self, dir: &Path, output: &Path) -> Result<u64> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let file =
            File::create(output).with_context(|| format!("creating {}", output.display()))?;
        let root = canonical(dir)?;
        let skip = canonical(output)?;

        let mut zip = zip::ZipWriter::new(file);

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() != skip);

        for entry in walker {
            let entry = entry.with_context(|| format!("walking {}", root.display()))?;
            let rel = entry
                .path()
                .strip_prefix(&root)
                .with_context(|| format!("{} is outside {}", entry.path().display(), root.display()))?;
            let name = entry_name(rel);
            let meta = entry
                .metadata()
                .with_context(|| format!("reading metadata of {}", entry.path().display()))?;

            if meta.is_dir() {
                let options = entry_options(mode_of(&meta, DEFAULT_DIR_MODE));
                zip.add_directory(name, options)
                    .with_context(|| format!("adding directory {}", rel.display()))?;
            } else {
                let options = entry_options(mode_of(&meta, DEFAULT_FILE_MODE));
                zip.start_file(name, options)
                    .with_context(|| format!("adding {}", rel.display()))?;
                let mut src = File::open(entry.path())
                    .with_context(|| format!("opening {}", entry.path().display()))?;
                io::copy(&mut src, &mut zip)
                    .with_context(|| format!("compressing {}", rel.display()))?;
            }
        }

        zip.finish().context("finalizing archive")?;
        let size = fs::metadata(output)
            .with_context(|| format!("reading size of {}", output.display()))?
            .len();
        debug!(archive = %output.display(), size, "archive written");
        Ok(size)
    }
}
