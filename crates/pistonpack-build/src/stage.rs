//! Dependency bundling.
//!
//! Decides, for every archive-relative path, which input source supplies
//! its final content. Sources are scanned strictly in priority order and
//! the first source to claim a path wins; later duplicates are skipped.
//! This keeps a transitively-bundled class from clobbering the plugin's own
//! compiled class of the same name.
//!
//! Within a single source, paths are staged in lexicographic order so the
//! result is byte-for-byte reproducible across runs.

use crate::{BuildError, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// One input to the bundler: a compiled-output directory or a library
/// archive whose entries are expanded into the staged set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl DependencySource {
    /// Classify a path by what is on disk: directories are staged file by
    /// file, anything else is treated as an archive to expand.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory(path)
        } else {
            Self::Archive(path)
        }
    }

    /// The filesystem path behind this source.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Archive(path) => path,
        }
    }
}

/// Archive-relative path to chosen content, built up in priority order.
///
/// Iteration is lexicographic by path, which is also the order entries are
/// written to the output archive.
#[derive(Debug, Clone, Default)]
pub struct StagedFileSet {
    entries: BTreeMap<String, Vec<u8>>,
}

impl StagedFileSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage content at `path` unless a higher-priority source already
    /// claimed it. Returns whether the entry was inserted.
    pub fn insert_if_absent(&mut self, path: impl Into<String>, contents: Vec<u8>) -> bool {
        let path = path.into();
        if self.entries.contains_key(&path) {
            return false;
        }

        self.entries.insert(path, contents);
        true
    }

    /// Stage content at a reserved path, failing if anything already
    /// claimed it. Used for the generated descriptor, which must never be
    /// silently displaced by a bundled dependency.
    pub fn insert_unique(&mut self, path: impl Into<String>, contents: Vec<u8>) -> Result<()> {
        let path = path.into();
        if self.entries.contains_key(&path) {
            return Err(BuildError::DuplicateArchiveEntry { path });
        }

        self.entries.insert(path, contents);
        Ok(())
    }

    /// Whether `path` has been claimed.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Content staged at `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Staged entries in lexicographic path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_slice()))
    }

    /// Number of staged entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan `sources` in priority order into a de-duplicated file set.
///
/// A source whose path does not exist or cannot be opened fails the whole
/// bundle with [`BuildError::SourceUnreadable`]; there is no best-effort
/// partial staging.
pub fn bundle(sources: &[DependencySource]) -> Result<StagedFileSet> {
    let mut staged = StagedFileSet::new();

    for source in sources {
        let before = staged.len();

        match source {
            DependencySource::Directory(path) => stage_directory(&mut staged, path)?,
            DependencySource::Archive(path) => stage_archive(&mut staged, path)?,
        }

        tracing::debug!(
            source = %source.path().display(),
            staged = staged.len() - before,
            "staged dependency source"
        );
    }

    Ok(staged)
}

/// Stage every file under `root` at its relative path.
fn stage_directory(staged: &mut StagedFileSet, root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(BuildError::SourceUnreadable {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| BuildError::SourceUnreadable {
                    path: root.to_path_buf(),
                })?;
            files.push((entry_path(relative), entry.path().to_path_buf()));
        }
    }

    files.sort();

    for (relative, path) in files {
        let contents = fs::read(&path)?;
        staged.insert_if_absent(relative, contents);
    }

    Ok(())
}

/// Expand an archive's entries and stage each at its entry path.
fn stage_archive(staged: &mut StagedFileSet, path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|_| BuildError::SourceUnreadable {
        path: path.to_path_buf(),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|_| BuildError::SourceUnreadable {
        path: path.to_path_buf(),
    })?;

    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();

    for name in names {
        let mut entry = archive.by_name(&name)?;
        if entry.is_dir() {
            continue;
        }

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        staged.insert_if_absent(name, contents);
    }

    Ok(())
}

/// Relative path with `/` separators, regardless of host platform.
fn entry_path(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
        for (path, contents) in files {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, contents).unwrap();
        }
    }

    fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        for (name, contents) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents).unwrap();
        }

        zip.finish().unwrap();
    }

    #[test]
    fn bundle___first_source_wins_on_duplicate_path() {
        let temp_dir = TempDir::new().unwrap();
        let own = temp_dir.path().join("own");
        let shared = temp_dir.path().join("shared");
        write_tree(&own, &[("com/demo/Main.class", b"own copy")]);
        write_tree(&shared, &[("com/demo/Main.class", b"shared copy")]);

        let staged = bundle(&[
            DependencySource::Directory(own),
            DependencySource::Directory(shared),
        ])
        .unwrap();

        assert_eq!(staged.get("com/demo/Main.class"), Some(&b"own copy"[..]));
        assert_eq!(staged.len(), 1);
    }

    #[test]
    fn bundle___archive_entries_lose_to_earlier_directory() {
        let temp_dir = TempDir::new().unwrap();
        let classes = temp_dir.path().join("classes");
        write_tree(&classes, &[("com/demo/Main.class", b"compiled")]);

        let jar = temp_dir.path().join("dep.jar");
        write_jar(
            &jar,
            &[
                ("com/demo/Main.class", b"bundled duplicate"),
                ("com/dep/Util.class", b"utility"),
            ],
        );

        let staged = bundle(&[
            DependencySource::Directory(classes),
            DependencySource::Archive(jar),
        ])
        .unwrap();

        assert_eq!(staged.get("com/demo/Main.class"), Some(&b"compiled"[..]));
        assert_eq!(staged.get("com/dep/Util.class"), Some(&b"utility"[..]));
        assert_eq!(staged.len(), 2);
    }

    #[test]
    fn bundle___missing_directory___returns_source_unreadable() {
        let result = bundle(&[DependencySource::Directory(PathBuf::from(
            "/nonexistent/classes",
        ))]);

        assert!(matches!(
            result.unwrap_err(),
            BuildError::SourceUnreadable { .. }
        ));
    }

    #[test]
    fn bundle___missing_archive___returns_source_unreadable() {
        let result = bundle(&[DependencySource::Archive(PathBuf::from(
            "/nonexistent/dep.jar",
        ))]);

        assert!(matches!(
            result.unwrap_err(),
            BuildError::SourceUnreadable { .. }
        ));
    }

    #[test]
    fn bundle___corrupt_archive___returns_source_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let jar = temp_dir.path().join("corrupt.jar");
        fs::write(&jar, b"not a zip file").unwrap();

        let result = bundle(&[DependencySource::Archive(jar)]);

        assert!(matches!(
            result.unwrap_err(),
            BuildError::SourceUnreadable { .. }
        ));
    }

    #[test]
    fn bundle___skips_archive_directory_entries() {
        let temp_dir = TempDir::new().unwrap();
        let jar = temp_dir.path().join("dep.jar");

        let file = File::create(&jar).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.add_directory("com/demo", options).unwrap();
        zip.start_file("com/demo/Main.class", options).unwrap();
        zip.write_all(b"compiled").unwrap();
        zip.finish().unwrap();

        let staged = bundle(&[DependencySource::Archive(jar)]).unwrap();

        assert_eq!(staged.len(), 1);
        assert!(staged.contains("com/demo/Main.class"));
    }

    #[test]
    fn bundle___iteration_is_lexicographic() {
        let temp_dir = TempDir::new().unwrap();
        let classes = temp_dir.path().join("classes");
        write_tree(
            &classes,
            &[
                ("z.txt", b"z"),
                ("a/b.txt", b"ab"),
                ("a.txt", b"a"),
                ("m/n/o.txt", b"mno"),
            ],
        );

        let staged = bundle(&[DependencySource::Directory(classes)]).unwrap();
        let paths: Vec<&str> = staged.iter().map(|(path, _)| path).collect();

        assert_eq!(paths, vec!["a.txt", "a/b.txt", "m/n/o.txt", "z.txt"]);
    }

    #[test]
    fn DependencySource___from_path___classifies_by_filesystem_state() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("classes");
        fs::create_dir(&dir).unwrap();
        let jar = temp_dir.path().join("dep.jar");
        fs::write(&jar, b"").unwrap();

        assert!(matches!(
            DependencySource::from_path(&dir),
            DependencySource::Directory(_)
        ));
        assert!(matches!(
            DependencySource::from_path(&jar),
            DependencySource::Archive(_)
        ));
    }

    #[test]
    fn StagedFileSet___insert_unique___rejects_claimed_path() {
        let mut staged = StagedFileSet::new();
        staged.insert_if_absent("plugin.yml", b"from a jar".to_vec());

        let result = staged.insert_unique("plugin.yml", b"generated".to_vec());

        assert!(matches!(
            result.unwrap_err(),
            BuildError::DuplicateArchiveEntry { path } if path == "plugin.yml"
        ));
    }

    #[test]
    fn StagedFileSet___insert_if_absent___reports_insertion() {
        let mut staged = StagedFileSet::new();

        assert!(staged.insert_if_absent("a.txt", b"first".to_vec()));
        assert!(!staged.insert_if_absent("a.txt", b"second".to_vec()));
        assert_eq!(staged.get("a.txt"), Some(&b"first"[..]));
    }
}
