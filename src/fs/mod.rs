//! Filesystem seam for bindings staging
//!
//! Staging only needs a handful of operations: probe a directory, enumerate
//! the files below it and copy single files. `RealFs` performs them on disk;
//! tests inject `MemoryFs` to observe writes and simulate failures.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, fs};

/// Operations bindings staging performs
pub trait Filesystem: std::fmt::Debug {
    fn is_dir(&self, path: &Path) -> bool;

    /// All regular files below `root`, symlinks resolved, sorted by path
    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy one file, replacing `to` if present
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// The host filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl Filesystem for RealFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| fs::read_failed(root.display().to_string(), e.to_string()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }
}

/// Copy a directory tree, skipping entries whose file name is in `exclude`
pub fn copy_tree(src: &Path, dst: &Path, exclude: &[&str]) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| fs::write_error(dst, &e))?;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !exclude.iter().any(|x| e.file_name().to_str() == Some(*x)));

    for entry in walker {
        let entry = entry.map_err(|e| fs::read_failed(src.display().to_string(), e.to_string()))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| fs::write_error(&target, &e))?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| fs::write_error(&target, &e))?;
        }
    }

    Ok(())
}

/// In-memory filesystem recording every write
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: std::sync::Mutex<MemoryState>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MemoryState {
    files: std::collections::BTreeMap<PathBuf, Vec<u8>>,
    dirs: std::collections::BTreeSet<PathBuf>,
    read_only: Vec<PathBuf>,
    writes: usize,
}

#[cfg(test)]
impl MemoryState {
    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only.iter().any(|ro| path.starts_with(ro)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        Ok(())
    }

    fn add_dirs(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

#[cfg(test)]
impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Seed a file without counting it as a write
    pub fn add_file(&self, path: impl AsRef<Path>, content: &[u8]) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            state.add_dirs(parent);
        }
        state.files.insert(path.to_path_buf(), content.to_vec());
    }

    /// Refuse writes at or below `path`
    pub fn set_read_only(&self, path: impl AsRef<Path>) {
        self.lock().read_only.push(path.as_ref().to_path_buf());
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    /// Files at or below `root`
    pub fn files_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        self.lock()
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect()
    }

    /// Number of successful file copies
    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

#[cfg(test)]
impl Filesystem for MemoryFs {
    fn is_dir(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.files_under(root))
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        if !state.dirs.contains(path) {
            state.check_writable(path)?;
            state.add_dirs(path);
        }
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.lock();
        state.check_writable(to)?;
        let Some(content) = state.files.get(from).cloned() else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", from.display()),
            ));
        };
        if let Some(parent) = to.parent() {
            if !state.dirs.contains(parent) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} does not exist", parent.display()),
                ));
            }
        }
        state.files.insert(to.to_path_buf(), content);
        state.writes += 1;
        Ok(())
    }
}
