//! Relocatable `.tar.gz` archives of test-data directories.

use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

/// Build a gzip-compressed tar archive of `source_dir` at `output_path`.
///
/// Every entry is prefixed with `source_dir`'s base name rather than its
/// full path, so the archive extracts to a single top-level directory
/// wherever it is unpacked. Entries use GNU-format headers for portable
/// extraction.
///
/// Creates or overwrites `output_path`.
///
/// # Errors
///
/// Filesystem errors (missing `source_dir`, permissions, disk full)
/// propagate. On a mid-way failure the file at `output_path` is unusable
/// and the caller owns its cleanup.
pub fn make_tar_gz(output_path: &Path, source_dir: &Path) -> Result<()> {
    let base_name = source_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            anyhow!("source directory {} has no usable base name", source_dir.display())
        })?;

    debug!(
        output = %output_path.display(),
        source = %source_dir.display(),
        root = base_name,
        "building archive"
    );

    let file = File::create(output_path)
        .with_context(|| format!("failed to create archive {}", output_path.display()))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(true);
    builder
        .append_dir_all(base_name, source_dir)
        .with_context(|| format!("failed to archive {}", source_dir.display()))?;
    let encoder = builder.into_inner().context("failed to flush archive")?;
    encoder.finish().context("failed to finish gzip stream")?;
    Ok(())
}
