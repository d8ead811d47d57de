//! Ordered image entries of one edit session, with the capacity and
//! display invariants the editor relies on.

use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use shared::domain::{ImageId, ProductImage};
use tracing::{debug, warn};

use crate::{error::StagedError, ids::IdGenerator};

/// Hard ceiling on active images per product.
pub const MAX_IMAGES: usize = 10;

/// Limits outside `1..=MAX_IMAGES` are pulled back into range.
pub fn clamp_max_images(requested: usize) -> usize {
    let clamped = requested.clamp(1, MAX_IMAGES);
    if clamped != requested {
        warn!(requested, clamped, "image limit out of range");
    }
    clamped
}

/// A file picked by the user that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub filename: String,
    pub mime_type: Option<String>,
    pub content: Arc<[u8]>,
}

impl LocalFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Self {
            filename,
            mime_type,
            content: content.into(),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read(path)
            .with_context(|| format!("failed to read image file '{}'", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("'{}' does not name a file", path.display()))?;
        Ok(Self::new(filename, content))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Existing { source_link: String },
    Local { file: LocalFile },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unchanged,
    MarkedForDeletion,
    NewlyAdded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub id: ImageId,
    pub origin: Origin,
    pub status: Status,
}

impl ImageEntry {
    fn existing(image: ProductImage) -> Self {
        Self {
            id: image.key,
            origin: Origin::Existing {
                source_link: image.link,
            },
            status: Status::Unchanged,
        }
    }

    fn local(id: ImageId, file: LocalFile) -> Self {
        Self {
            id,
            origin: Origin::Local { file },
            status: Status::NewlyAdded,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status != Status::MarkedForDeletion
    }

    pub fn is_local(&self) -> bool {
        matches!(self.origin, Origin::Local { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverChange {
    pub id: ImageId,
    /// Previous cover, dropped from the sequence without being flagged for deletion.
    pub displaced: Option<ImageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Local entry taken out of the sequence; its preview must be released.
    Discarded(ImageEntry),
    MarkedForDeletion,
    AlreadyMarked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImageCollection {
    entries: Vec<ImageEntry>,
    max_images: usize,
}

impl StagedImageCollection {
    pub fn new(max_images: usize) -> Self {
        let max_images = clamp_max_images(max_images);
        Self {
            entries: Vec::new(),
            max_images,
        }
    }

    pub fn seed_from_existing(
        images: impl IntoIterator<Item = ProductImage>,
        max_images: usize,
    ) -> Self {
        let max_images = clamp_max_images(max_images);
        let mut entries: Vec<ImageEntry> = images.into_iter().map(ImageEntry::existing).collect();
        if entries.len() > max_images {
            warn!(
                received = entries.len(),
                max_images, "stored product exceeds image capacity; extra images hidden"
            );
            entries.truncate(max_images);
        }
        Self {
            entries,
            max_images,
        }
    }

    pub fn set_cover(&mut self, file: LocalFile, ids: &mut dyn IdGenerator) -> CoverChange {
        let id = ids.next_id();
        let cover = ImageEntry::local(id.clone(), file);

        let displaced = match self.entries.iter().position(ImageEntry::is_active) {
            Some(position) => Some(std::mem::replace(&mut self.entries[position], cover)),
            None => {
                self.entries.insert(0, cover);
                None
            }
        };

        debug!(cover = %id, displaced = ?displaced.as_ref().map(|e| &e.id), "cover replaced");
        CoverChange { id, displaced }
    }

    /// Appends as many files as capacity allows; the rest are dropped.
    pub fn append_gallery_files(
        &mut self,
        files: impl IntoIterator<Item = LocalFile>,
        ids: &mut dyn IdGenerator,
    ) -> Vec<ImageId> {
        let remaining = self.remaining_capacity();
        let mut appended = Vec::new();
        let mut dropped = 0usize;

        for file in files {
            if appended.len() == remaining {
                dropped += 1;
                continue;
            }
            let id = ids.next_id();
            self.entries.push(ImageEntry::local(id.clone(), file));
            appended.push(id);
        }

        if dropped > 0 {
            debug!(
                appended = appended.len(),
                dropped, "gallery selection clamped to image capacity"
            );
        }
        appended
    }

    pub fn mark_or_remove(&mut self, id: &ImageId) -> Result<Removal, StagedError> {
        let position = self
            .entries
            .iter()
            .position(|entry| &entry.id == id)
            .ok_or_else(|| StagedError::NotFound(id.clone()))?;

        if self.entries[position].is_local() {
            return Ok(Removal::Discarded(self.entries.remove(position)));
        }
        let entry = &mut self.entries[position];
        if entry.status == Status::MarkedForDeletion {
            return Ok(Removal::AlreadyMarked);
        }
        entry.status = Status::MarkedForDeletion;
        Ok(Removal::MarkedForDeletion)
    }

    pub fn active_view(&self) -> Vec<&ImageEntry> {
        self.entries.iter().filter(|e| e.is_active()).collect()
    }

    pub fn cover(&self) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.is_active())
    }

    pub fn gallery(&self) -> Vec<&ImageEntry> {
        self.entries.iter().filter(|e| e.is_active()).skip(1).collect()
    }

    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_active()).count()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.max_images.saturating_sub(self.active_count())
    }

    /// Full sequence, including entries hidden because they are marked for deletion.
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, id: &ImageId) -> Option<&ImageEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }
}

#[cfg(test)]
#[path = "tests/staged_tests.rs"]
mod tests;
