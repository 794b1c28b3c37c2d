// brewlet-core/src/install/extract.rs
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use brewlet_common::error::{BrewletError, Result};
use flate2::read::GzDecoder;
use tar::{Archive, EntryType};
use tracing::{debug, warn};

#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub mode: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ArchiveEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("path", &self.path)
            .field("mode", &format_args!("{:o}", self.mode))
            .field("len", &self.data.len())
            .finish()
    }
}

/// In-memory listing of the regular files in an archive, keyed by their normalized
/// relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveContents {
    entries: BTreeMap<PathBuf, ArchiveEntry>,
}

impl ArchiveContents {
    pub fn from_entries(entries: impl IntoIterator<Item = ArchiveEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.path.clone(), entry))
                .collect(),
        }
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&ArchiveEntry> {
        self.entries.get(path.as_ref())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The directory every entry lives under, if there is exactly one and no entry sits
    /// at the archive root.
    pub fn single_root(&self) -> Option<PathBuf> {
        let mut root: Option<&std::ffi::OsStr> = None;
        for path in self.entries.keys() {
            let mut components = path.components();
            let first = match components.next() {
                Some(Component::Normal(name)) => name,
                _ => return None,
            };
            components.next()?;
            match root {
                None => root = Some(first),
                Some(existing) if existing == first => {}
                Some(_) => return None,
            }
        }
        root.map(PathBuf::from)
    }

    /// Contents with the common root directory removed, or unchanged when there is none.
    pub fn without_single_root(&self) -> Cow<'_, ArchiveContents> {
        match self.single_root() {
            Some(root) => {
                debug!("Stripping archive root directory {}", root.display());
                Cow::Owned(Self::from_entries(self.entries.values().filter_map(|e| {
                    e.path.strip_prefix(&root).ok().map(|rest| ArchiveEntry {
                        path: rest.to_path_buf(),
                        mode: e.mode,
                        data: e.data.clone(),
                    })
                })))
            }
            None => Cow::Borrowed(self),
        }
    }
}

/// Decompresses a gzipped tarball held in memory. Only regular files are kept; links
/// and special files are skipped. Paths that would escape the archive root make the
/// whole archive `MalformedArchive`.
pub fn extract_tar_gz(bytes: &[u8]) -> Result<ArchiveContents> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    let mut entries = Vec::new();

    let iter = archive
        .entries()
        .map_err(|e| BrewletError::MalformedArchive(format!("not a readable tar.gz: {e}")))?;
    for entry_result in iter {
        let mut entry = entry_result.map_err(|e| {
            BrewletError::MalformedArchive(format!("error reading tar entry: {e}"))
        })?;
        let original = entry
            .path()
            .map_err(|e| BrewletError::MalformedArchive(format!("invalid entry path: {e}")))?
            .into_owned();

        let entry_type = entry.header().entry_type();
        match entry_type {
            EntryType::Regular | EntryType::Continuous => {}
            EntryType::Directory => continue,
            other => {
                warn!(
                    "Skipping non-regular archive entry {} ({:?})",
                    original.display(),
                    other
                );
                continue;
            }
        }

        let Some(path) = normalize_entry_path(&original)? else {
            continue;
        };
        let mode = entry.header().mode().unwrap_or(0o644);
        // Header sizes are untrusted; let the buffer grow with what is actually read.
        let mut data = Vec::new();
        entry.read_to_end(&mut data).map_err(|e| {
            BrewletError::MalformedArchive(format!(
                "failed to read {} from archive: {}",
                original.display(),
                e
            ))
        })?;
        debug!("Read archive entry {} ({} bytes)", path.display(), data.len());
        entries.push(ArchiveEntry { path, mode, data });
    }

    let contents = ArchiveContents::from_entries(entries);
    if contents.is_empty() {
        return Err(BrewletError::MalformedArchive(
            "archive contains no files".to_string(),
        ));
    }
    Ok(contents)
}

fn normalize_entry_path(original: &Path) -> Result<Option<PathBuf>> {
    let mut path = PathBuf::new();
    for component in original.components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => {
                return Err(BrewletError::MalformedArchive(format!(
                    "unsafe path component {:?} in entry {}",
                    component,
                    original.display()
                )));
            }
        }
    }
    Ok((!path.as_os_str().is_empty()).then_some(path))
}
