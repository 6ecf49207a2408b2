//! Archive assembly.
//!
//! Writes a [`StagedFileSet`] into one output archive. Entries are written
//! in lexicographic path order with Deflate compression, so assembling the
//! same set twice yields the same archive. The archive is built at a
//! temporary path and moved into place on success; a partially written file
//! never lands at the final output path.

use crate::stage::StagedFileSet;
use crate::{BuildError, Result};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A successfully assembled output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Final location of the archive.
    pub archive_path: PathBuf,

    /// Archive size in bytes.
    pub size_bytes: u64,

    /// Number of staged entries written.
    pub file_count: usize,

    /// SHA-256 of the archive file, hex-encoded.
    pub checksum: String,
}

/// Write every staged entry into an archive at `output_path`.
///
/// Parent directories are created as needed and a pre-existing file at
/// `output_path` is replaced. Two staged entries that normalize to the same
/// archive path fail with [`BuildError::DuplicateArchiveEntry`]; the staging
/// invariant makes this unreachable in practice, but the assembler never
/// silently writes an archive with duplicate entries.
pub fn assemble(staged: &StagedFileSet, output_path: &Path) -> Result<BuildArtifact> {
    let parent = output_path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;

    {
        let mut zip = ZipWriter::new(&mut temp);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut seen = HashSet::new();
        for (path, contents) in staged.iter() {
            let normalized = normalize_entry_path(path);
            if !seen.insert(normalized.clone()) {
                return Err(BuildError::DuplicateArchiveEntry { path: normalized });
            }

            zip.start_file(normalized, options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
    }

    let mut bytes = Vec::new();
    temp.seek(SeekFrom::Start(0))?;
    temp.read_to_end(&mut bytes)?;
    let checksum = hex::encode(Sha256::digest(&bytes));

    temp.persist(output_path).map_err(|err| err.error)?;

    Ok(BuildArtifact {
        archive_path: output_path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        file_count: staged.len(),
        checksum,
    })
}

/// Canonical archive-entry form of a staged path.
fn normalize_entry_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");

    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.to_string();
    }

    normalized.trim_start_matches('/').to_string()
}
