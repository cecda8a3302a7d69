use super::error::ArtifactError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Defines the interface for reading and writing one kind of artifact.
///
/// Implementors only handle the format on generic readers and writers; the
/// path-based helpers take care of buffering and of atomic replacement.
pub trait ArtifactFile {
    /// The in-memory form of the whole artifact.
    type Content;

    /// Reads the full artifact from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails or a record cannot be parsed.
    fn read_from(reader: impl Read) -> Result<Self::Content, ArtifactError>;

    /// Writes the full artifact, header included, to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(content: &Self::Content, writer: impl Write) -> Result<(), ArtifactError>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Content, ArtifactError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    fn write_to_path<P: AsRef<Path>>(content: &Self::Content, path: P) -> Result<(), ArtifactError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(content, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes to a sibling temporary file and renames it over `path`, so a
    /// reader never observes a half-written artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or renaming fails. The temporary file is
    /// removed on a failed write.
    fn write_to_path_atomic<P: AsRef<Path>>(
        content: &Self::Content,
        path: P,
    ) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let temp = temporary_path(path);
        if let Err(err) = Self::write_to_path(content, &temp) {
            let _ = fs::remove_file(&temp);
            return Err(err);
        }
        fs::rename(&temp, path)?;
        Ok(())
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
