//! JSON persistence for trained models and evaluation splits.
//!
//! Every artifact is a versioned envelope:
//!
//! ```json
//! { "format": "salary-forest", "version": 1, "kind": "model", "payload": { ... } }
//! ```
//!
//! Reading checks the format tag, version and kind before converting the
//! payload into runtime types with full validation. Writing goes through a
//! temporary sibling file that is renamed into place, so a crash never leaves
//! a half-written artifact at the target path.

mod convert;
mod error;
pub mod schema;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::{ReadError, WriteError};
use schema::{ArtifactKind, Envelope, EvaluationSplitSchema, SalaryModelSchema, FORMAT_NAME, SCHEMA_VERSION};

use crate::data::EvaluationSplit;
use crate::model::SalaryModel;

// =============================================================================
// Model
// =============================================================================

impl SalaryModel {
    /// Serialize to JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        write_envelope(writer, ArtifactKind::Model, SalaryModelSchema::from(self))
    }

    /// Deserialize from JSON, validating the result.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, ReadError> {
        let schema: SalaryModelSchema = read_envelope(reader, ArtifactKind::Model)?;
        SalaryModel::try_from(schema)
    }

    /// Save to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        atomic_write(path.as_ref(), |w| self.write_json(w))
    }

    /// Load from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        Self::read_json(BufReader::new(File::open(path)?))
    }
}

// =============================================================================
// Evaluation split
// =============================================================================

impl EvaluationSplit {
    /// Serialize to JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        write_envelope(
            writer,
            ArtifactKind::EvaluationSplit,
            EvaluationSplitSchema::from(self),
        )
    }

    /// Deserialize from JSON, validating the result.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, ReadError> {
        let schema: EvaluationSplitSchema = read_envelope(reader, ArtifactKind::EvaluationSplit)?;
        EvaluationSplit::try_from(schema)
    }

    /// Save to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        atomic_write(path.as_ref(), |w| self.write_json(w))
    }

    /// Load from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        Self::read_json(BufReader::new(File::open(path)?))
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn kind_name(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Model => "model",
        ArtifactKind::EvaluationSplit => "evaluation_split",
    }
}

fn write_envelope<W: Write, T: Serialize>(writer: W, kind: ArtifactKind, payload: T) -> Result<(), WriteError> {
    let envelope = Envelope {
        format: FORMAT_NAME.to_owned(),
        version: SCHEMA_VERSION,
        kind,
        payload,
    };
    serde_json::to_writer(writer, &envelope)?;
    Ok(())
}

fn read_envelope<R: Read, T: DeserializeOwned>(reader: R, expected: ArtifactKind) -> Result<T, ReadError> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_reader(reader)?;
    if envelope.format != FORMAT_NAME {
        return Err(ReadError::UnsupportedFormat(envelope.format));
    }
    if envelope.version != SCHEMA_VERSION {
        return Err(ReadError::UnsupportedVersion {
            found: envelope.version,
            supported: SCHEMA_VERSION,
        });
    }
    if envelope.kind != expected {
        return Err(ReadError::WrongKind {
            expected: kind_name(expected).to_owned(),
            found: kind_name(envelope.kind).to_owned(),
        });
    }
    Ok(serde_json::from_value(envelope.payload)?)
}

fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn atomic_write(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<(), WriteError>,
) -> Result<(), WriteError> {
    StagedFile::create(path, write)?.commit()
}

/// A fully written temporary file waiting to be renamed onto its target.
///
/// Dropping an uncommitted file removes the temporary.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    tmp: PathBuf,
}

impl StagedFile {
    /// Write `path`'s new contents to a temporary sibling and sync it.
    pub fn create(
        path: &Path,
        write: impl FnOnce(&mut BufWriter<File>) -> Result<(), WriteError>,
    ) -> Result<Self, WriteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staged = Self {
            path: path.to_path_buf(),
            tmp: temp_path(path),
        };
        let mut writer = BufWriter::new(File::create(&staged.tmp)?);
        write(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(staged)
    }

    /// Rename the temporary onto the target.
    pub fn commit(self) -> Result<(), WriteError> {
        rename_into_place(&self.tmp, &self.path)?;
        log::debug!("wrote {}", self.path.display());
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // No-op once the temporary has been renamed.
        let _ = fs::remove_file(&self.tmp);
    }
}

fn rename_into_place(from: &Path, to: &Path) -> Result<(), WriteError> {
    fs::rename(from, to).map_err(|source| WriteError::Replace {
        path: to.to_path_buf(),
        source,
    })
}

/// Move several staged files into place as one unit.
///
/// Existing targets are moved aside first. If any rename fails, targets
/// already replaced are put back, so on error every target keeps its
/// previous contents (or stays absent).
pub fn commit_all(staged: Vec<StagedFile>) -> Result<(), WriteError> {
    let mut backups: Vec<Option<PathBuf>> = Vec::with_capacity(staged.len());
    let mut replaced = 0;
    let result = (|| {
        for file in &staged {
            let backup = if file.path.is_file() {
                let backup = backup_path(&file.path);
                rename_into_place(&file.path, &backup)?;
                Some(backup)
            } else {
                None
            };
            backups.push(backup);
        }
        for file in &staged {
            rename_into_place(&file.tmp, &file.path)?;
            replaced += 1;
        }
        Ok::<_, WriteError>(())
    })();

    match result {
        Ok(()) => {
            for (file, backup) in staged.iter().zip(&backups) {
                if let Some(backup) = backup {
                    let _ = fs::remove_file(backup);
                }
                log::debug!("wrote {}", file.path.display());
            }
            Ok(())
        }
        Err(e) => {
            for (i, (file, backup)) in staged.iter().zip(&backups).enumerate() {
                if i < replaced {
                    let _ = fs::remove_file(&file.path);
                }
                if let Some(backup) = backup {
                    if let Err(restore) = fs::rename(backup, &file.path) {
                        log::error!("could not restore {}: {restore}", file.path.display());
                    }
                }
            }
            Err(e)
        }
    }
}
