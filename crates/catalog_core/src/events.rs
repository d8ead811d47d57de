//! UI-facing contract of an edit session: the events it accepts and the
//! snapshot it renders from.

use shared::domain::ImageId;

use crate::{session::SessionMode, staged::LocalFile};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    ChooseCoverFile(LocalFile),
    ChooseGalleryFiles(Vec<LocalFile>),
    DeleteEntry(ImageId),
    Cancel,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::ChooseCoverFile(_) => "choose_cover_file",
            SessionEvent::ChooseGalleryFiles(_) => "choose_gallery_files",
            SessionEvent::DeleteEntry(_) => "delete_entry",
            SessionEvent::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    pub id: ImageId,
    /// Stored link, or a preview handle for files not yet uploaded.
    pub src: String,
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub mode: SessionMode,
    pub cover: Option<DisplayImage>,
    /// Gallery tiles carry the delete affordance; the cover does not.
    pub gallery: Vec<DisplayImage>,
    pub can_add_cover: bool,
    pub can_add_gallery: bool,
    pub remaining_capacity: usize,
}
