//! Whole-file reads and replace-by-rename writes

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Path of the intermediate file written next to `target`: the same name
/// with a `+` appended.
pub fn sibling_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push("+");
    PathBuf::from(name)
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Open a file for buffered line-by-line reading.
pub fn open_reader(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::io(path, e))
}

/// Intermediate file that replaces its target on [`SiblingFile::commit`].
///
/// The target is never touched until the intermediate file is fully written
/// and synced. If the final rename fails both files remain on disk.
#[derive(Debug)]
pub struct SiblingFile {
    target: PathBuf,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SiblingFile {
    /// Create (or truncate) the intermediate file for `target` and take an
    /// exclusive advisory lock on it. An existing target's permissions are
    /// copied onto it.
    pub fn create(target: &Path) -> Result<Self> {
        let path = sibling_path(target);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        FileExt::lock_exclusive(&file).map_err(|_| Error::LockFailed { path: path.clone() })?;

        // The replacement keeps the target's mode.
        if let Ok(metadata) = fs::metadata(target) {
            file.set_permissions(metadata.permissions())
                .map_err(|e| Error::io(&path, e))?;
        }

        tracing::debug!(path = %path.display(), "Created intermediate file");

        Ok(Self {
            target: target.to_path_buf(),
            path,
            writer: BufWriter::new(file),
        })
    }

    /// The intermediate file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file this one will replace.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush, sync and rename the intermediate file over the target.
    ///
    /// If flushing or syncing fails the intermediate file is removed and the
    /// target is left as it was.
    pub fn commit(self) -> Result<()> {
        let Self {
            target,
            path,
            writer,
        } = self;

        let file = match writer.into_inner() {
            Ok(file) => file,
            Err(e) => {
                let error = e.into_error();
                let _ = fs::remove_file(&path);
                return Err(Error::io(&path, error));
            }
        };
        if let Err(e) = file.sync_all() {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(Error::io(&path, e));
        }
        FileExt::unlock(&file).map_err(|_| Error::LockFailed { path: path.clone() })?;
        drop(file);

        fs::rename(&path, &target).map_err(|source| Error::Replace {
            target: target.clone(),
            intermediate: path.clone(),
            source,
        })?;

        tracing::debug!(target = %target.display(), "Replaced target with intermediate file");
        Ok(())
    }

    /// Remove the intermediate file, leaving the target as it was.
    pub fn discard(self) -> Result<()> {
        let Self { path, writer, .. } = self;
        drop(writer);
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        tracing::debug!(path = %path.display(), "Discarded intermediate file");
        Ok(())
    }
}

impl Write for SiblingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
