//! file access used by the workspace parser
//!
//! [LocalFs] reads from disk, [MemoryFs] serves files kept in memory.
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Read-only view of a file tree
pub trait FileSource {
    fn dir_exists(&self, path: &Path) -> io::Result<bool>;

    /// Entries of a directory (not recursive)
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// The local filesystem
///
/// Directory entries are sorted by name.
#[derive(Default, Debug, Clone, Copy)]
pub struct LocalFs;

impl FileSource for LocalFs {
    fn dir_exists(&self, path: &Path) -> io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = vec![];
        for dir_entry in std::fs::read_dir(path)? {
            let dir_entry = dir_entry?;
            entries.push(DirEntry::new(
                dir_entry.file_name().to_string_lossy().into_owned(),
                dir_entry.file_type()?.is_dir(),
            ));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory file tree
///
/// Directories exist implicitly as parents of files. The root (empty path or `.`) always exists.
#[derive(Default, Debug, Clone)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryFs {
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files.insert(clean(path.as_ref()), contents.into());
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl<P: AsRef<Path>, C: Into<Vec<u8>>> FromIterator<(P, C)> for MemoryFs {
    fn from_iter<T: IntoIterator<Item = (P, C)>>(iter: T) -> Self {
        let mut fs = MemoryFs::default();
        for (path, contents) in iter {
            fs.insert(path, contents);
        }
        fs
    }
}

impl FileSource for MemoryFs {
    fn dir_exists(&self, path: &Path) -> io::Result<bool> {
        let path = clean(path);
        if path.as_os_str().is_empty() {
            return Ok(true);
        }

        Ok(self
            .files
            .keys()
            .any(|file| file != &path && file.starts_with(&path)))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if !self.dir_exists(path)? {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {}", path.display()),
            ));
        }

        let dir = clean(path);
        let mut entries: Vec<DirEntry> = vec![];
        for file in self.files.keys() {
            let Ok(rest) = file.strip_prefix(&dir) else {
                continue;
            };

            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };

            let entry = DirEntry::new(
                first.as_os_str().to_string_lossy().into_owned(),
                components.next().is_some(),
            );
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(&clean(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }
}

/// Drop `.` components so that `./a/b` and `a/b` are the same key
fn clean(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// Utility macro to create a [MemoryFs]
///
/// ```
/// # use tfsummary::memory_fs;
/// use tfsummary::fs::FileSource;
///
/// let fs = memory_fs! {
///   "main.tf" => r#"variable "a" {}"#,
///   "modules/vpc/main.tf" => r#"variable "b" {}"#
/// };
/// assert!(fs.dir_exists("modules".as_ref()).unwrap());
/// ```
#[macro_export]
macro_rules! memory_fs {
    { $($path:expr => $contents:expr),* $(,)? } => {{
        let mut fs = $crate::fs::MemoryFs::default();
        $(
            fs.insert($path, $contents);
        )*
        fs
    }};
}
