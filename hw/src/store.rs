use crate::{
    dataset::{Dataset, Label, LabelStatus},
    error::{HwErrorExt, Result},
    s,
    stroke::Drawing,
};
use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

/// The dataset being collected, shared between the canvas and whatever does file I/O.
///
/// Loads decode fully before touching the held dataset, so a bad file never leaves it half
/// replaced. Saves only read.
#[derive(Debug, Default)]
pub struct DatasetStore {
    dataset: Mutex<Dataset>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        DatasetStore {
            dataset: Mutex::new(dataset),
        }
    }

    // every write replaces a whole map entry or the whole map, so a poisoned lock still holds a
    // consistent dataset
    fn lock(&self) -> MutexGuard<'_, Dataset> {
        self.dataset
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_drawing(&self, label: &str) -> Drawing {
        self.lock().get_drawing(label)
    }

    pub fn set_drawing(&self, label: impl Into<Label>, drawing: Drawing) {
        self.lock().set_drawing(label, drawing);
    }

    /// Store what the canvas holds for `label`. Same as [DatasetStore::set_drawing].
    pub fn commit(&self, label: impl Into<Label>, drawing: Drawing) {
        let label = label.into();
        tracing::info!("commit {} strokes to {label}", drawing.len());
        self.set_drawing(label, drawing);
    }

    pub fn status(&self, label: &str) -> LabelStatus {
        self.lock().status(label)
    }

    pub fn snapshot(&self) -> Dataset {
        self.lock().clone()
    }

    pub fn replace(&self, dataset: Dataset) -> Dataset {
        std::mem::replace(&mut *self.lock(), dataset)
    }

    pub fn with<T>(&self, f: impl FnOnce(&Dataset) -> T) -> T {
        f(&self.lock())
    }

    /// Replace the held dataset with the one at `path`. On error the held dataset is untouched.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
        let dataset = Dataset::load(path).problem(s!(CouldNotOpenFile))?;
        self.replace(dataset);
        Ok(())
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> Result<()> {
        let dataset = Dataset::from_slice(bytes).problem(s!(CouldNotOpenFile))?;
        self.replace(dataset);
        Ok(())
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        self.lock().save().problem(s!(CouldNotSaveFile))
    }

    pub fn export(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        // clone under the lock, encode and write without it
        let snapshot = self.snapshot();
        snapshot
            .write(path, pretty)
            .problem(s!(CouldNotSaveFile))
    }

    /// Export to `file_name` in the temp directory, for handing to a share sheet.
    pub fn export_to_temp(&self, file_name: &str, pretty: bool) -> Result<PathBuf> {
        let path = std::env::temp_dir().join(file_name);
        self.export(&path, pretty)?;
        Ok(path)
    }
}
