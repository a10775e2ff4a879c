use std::{
    fs::{
        self,
        File,
    },
    io,
    path::{
        Path,
        PathBuf,
    },
};

use tempfile::{
    NamedTempFile,
    TempDir,
};
use tracing::{
    debug,
    info,
};
use walkdir::WalkDir;
use zip::{
    write::SimpleFileOptions,
    CompressionMethod,
    ZipArchive,
    ZipWriter,
};

use crate::core::WordpackError;

/// Collection file names, most preferred first.
const COLLECTION_NAMES: &[&str] = &["collection.anki21", "collection.anki2"];
const COMPRESSED_COLLECTION: &str = "collection.anki21b";

/// An `.apkg` unpacked into a temporary directory. The directory is removed
/// when the package is dropped.
pub struct Package {
    source: PathBuf,
    work_dir: TempDir,
}

impl Package {
    pub fn extract(apkg_path: &Path) -> Result<Self, WordpackError> {
        let work_dir = tempfile::Builder::new().prefix("wordpack-").tempdir()?;

        let file = File::open(apkg_path)?;
        let mut archive = ZipArchive::new(file)?;
        archive.extract(work_dir.path())?;
        info!(
            "Extracted {} ({} entries) to {}",
            apkg_path.display(),
            archive.len(),
            work_dir.path().display()
        );

        Ok(Self { source: apkg_path.to_path_buf(), work_dir })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn collection_path(&self) -> Result<PathBuf, WordpackError> {
        if let Some(path) = COLLECTION_NAMES
            .iter()
            .map(|name| self.work_dir().join(name))
            .find(|path| path.is_file())
        {
            return Ok(path);
        }

        let compressed = self.work_dir().join(COMPRESSED_COLLECTION);
        if compressed.is_file() {
            return Err(WordpackError::UnsupportedCollection(self.source.clone()));
        }
        Err(WordpackError::MissingCollection(self.source.clone()))
    }

    /// Zips every extracted file back up under its original relative path.
    /// The archive is built next to `output` and only moved into place once
    /// complete, so a failed repack leaves `output` untouched.
    pub fn repack(&self, output: &Path) -> Result<PathBuf, WordpackError> {
        let parent = match output.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let mut zip = ZipWriter::new(NamedTempFile::new_in(parent)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut written = 0;
        for entry in WalkDir::new(self.work_dir()).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(self.work_dir())
                .map_err(|e| WordpackError::Custom(e.to_string()))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            zip.start_file(name.as_str(), options)?;
            io::copy(&mut File::open(entry.path())?, &mut zip)?;
            debug!("Packed {}", name);
            written += 1;
        }
        let staged = zip.finish()?;
        staged.persist(output).map_err(|e| WordpackError::Io(Box::new(e.error)))?;

        info!("Packed {} files into {}", written, output.display());
        Ok(output.to_path_buf())
    }
}
