use shared::domain::{ImageId, Product, ProductId};
use tracing::{debug, info, warn};

use crate::{
    commit::{prepare_commit, FormFields},
    config::EditorSettings,
    error::SessionError,
    events::{DisplayImage, EditorView, SessionEvent},
    ids::{IdGenerator, UuidIds},
    preview::PreviewResourceManager,
    staged::{ImageEntry, LocalFile, Removal, StagedImageCollection, Status},
    DeletionSink, SeedSource, SubmissionSink,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
    Submitting,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Edit,
}

/// One product editor session: owns the staged images, the preview handles
/// backing them, and the scalar form fields until submit or cancel.
pub struct EditSessionController<G: IdGenerator = UuidIds> {
    settings: EditorSettings,
    ids: G,
    state: SessionState,
    target_id: Option<ProductId>,
    fields: FormFields,
    images: StagedImageCollection,
    previews: PreviewResourceManager,
}

impl EditSessionController<UuidIds> {
    pub fn with_settings(settings: EditorSettings) -> Self {
        Self::new(settings, UuidIds)
    }
}

impl<G: IdGenerator> EditSessionController<G> {
    pub fn new(settings: EditorSettings, ids: G) -> Self {
        let images = StagedImageCollection::new(settings.max_images);
        let previews = PreviewResourceManager::new(settings.preview_scheme.clone());
        Self {
            settings,
            ids,
            state: SessionState::Unopened,
            target_id: None,
            fields: FormFields::default(),
            images,
            previews,
        }
    }

    pub fn open_create(&mut self) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Unopened, "open")?;
        self.state = SessionState::Open;
        info!(mode = "create", "edit session opened");
        Ok(())
    }

    pub fn open_edit(&mut self, product: Product) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Unopened, "open")?;

        self.fields = FormFields {
            name: Some(product.name),
            price: Some(product.price.to_string()),
            description: Some(product.description).filter(|d| !d.is_empty()),
        };
        self.images =
            StagedImageCollection::seed_from_existing(product.images, self.settings.max_images);
        self.target_id = Some(product.id);
        self.state = SessionState::Open;

        info!(
            mode = "edit",
            product = ?self.target_id,
            images = self.images.active_count(),
            "edit session opened"
        );
        Ok(())
    }

    pub async fn open_from_source(
        &mut self,
        source: &dyn SeedSource,
        product_id: &ProductId,
    ) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Unopened, "open")?;
        let product = source
            .fetch_product(product_id)
            .await
            .map_err(|error| SessionError::Seed(format!("{error:#}")))?;
        self.open_edit(product)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> SessionMode {
        if self.target_id.is_some() {
            SessionMode::Edit
        } else {
            SessionMode::Create
        }
    }

    pub fn target_id(&self) -> Option<&ProductId> {
        self.target_id.as_ref()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn images(&self) -> &StagedImageCollection {
        &self.images
    }

    pub fn previews(&self) -> &PreviewResourceManager {
        &self.previews
    }

    pub fn set_fields(&mut self, fields: FormFields) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Open, "edit fields")?;
        self.fields = fields;
        Ok(())
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        debug!(event = event.name(), "session event");
        match event {
            SessionEvent::ChooseCoverFile(file) => self.choose_cover_file(file).map(|_| ()),
            SessionEvent::ChooseGalleryFiles(files) => {
                self.choose_gallery_files(files).map(|_| ())
            }
            SessionEvent::DeleteEntry(id) => self.delete_entry(&id),
            SessionEvent::Cancel => self.cancel(),
        }
    }

    pub fn choose_cover_file(&mut self, file: LocalFile) -> Result<ImageId, SessionError> {
        self.ensure_state(SessionState::Open, "choose a cover")?;
        if !self.settings.accepts(file.mime_type.as_deref()) {
            warn!(
                file = %file.filename,
                mime = ?file.mime_type,
                "cover rejected: unsupported format"
            );
            return Err(SessionError::UnsupportedFormat {
                filename: file.filename,
                mime_type: file.mime_type,
            });
        }

        let change = self.images.set_cover(file, &mut self.ids);
        if let Some(displaced) = &change.displaced {
            self.previews.release(&displaced.id);
        }
        Ok(change.id)
    }

    /// Unsupported files are skipped; the rest are appended up to capacity.
    pub fn choose_gallery_files(
        &mut self,
        files: Vec<LocalFile>,
    ) -> Result<Vec<ImageId>, SessionError> {
        self.ensure_state(SessionState::Open, "add gallery images")?;
        let accepted: Vec<LocalFile> = files
            .into_iter()
            .filter(|file| {
                let ok = self.settings.accepts(file.mime_type.as_deref());
                if !ok {
                    warn!(
                        file = %file.filename,
                        mime = ?file.mime_type,
                        "gallery file skipped: unsupported format"
                    );
                }
                ok
            })
            .collect();

        Ok(self.images.append_gallery_files(accepted, &mut self.ids))
    }

    pub fn delete_entry(&mut self, id: &ImageId) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Open, "delete an image")?;
        match self.images.mark_or_remove(id) {
            Ok(Removal::Discarded(entry)) => {
                self.previews.release(&entry.id);
                debug!(image = %id, "local image discarded");
            }
            Ok(Removal::MarkedForDeletion) => {
                debug!(image = %id, "stored image marked for deletion")
            }
            Ok(Removal::AlreadyMarked) => {}
            Err(error) => warn!(%error, "ignoring delete for unknown image"),
        }
        Ok(())
    }

    pub fn view(&mut self) -> EditorView {
        let previews = &mut self.previews;
        let mut display = |entry: &ImageEntry| DisplayImage {
            id: entry.id.clone(),
            src: previews.handle_for(entry),
            is_new: entry.status == Status::NewlyAdded,
        };

        let active = self.images.active_view();
        let cover = active.first().map(|entry| display(*entry));
        let gallery = active.iter().skip(1).map(|entry| display(*entry)).collect();
        let remaining_capacity = self.images.remaining_capacity();

        EditorView {
            mode: self.mode(),
            cover,
            gallery,
            can_add_cover: active.is_empty(),
            can_add_gallery: remaining_capacity > 0,
            remaining_capacity,
        }
    }

    /// Validation failures and sink rejections leave the session open with
    /// every staged image and preview intact.
    pub async fn submit(&mut self, sink: &dyn SubmissionSink) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Open, "submit")?;
        let payload = prepare_commit(&self.images, &self.fields, self.target_id.as_ref())
            .map_err(|errors| {
                debug!(%errors, "submit blocked by validation");
                SessionError::Validation(errors)
            })?;

        info!(
            create = payload.is_create(),
            product = ?payload.target_id,
            uploads = payload.files_to_upload.len(),
            deletions = payload.ids_to_delete.len(),
            "submitting product changes"
        );
        self.state = SessionState::Submitting;

        match sink.submit(payload).await {
            Ok(()) => {
                self.close("submitted");
                Ok(())
            }
            Err(error) => {
                self.state = SessionState::Open;
                let reason = format!("{error:#}");
                warn!(%reason, "submission rejected; session kept open");
                Err(SessionError::SubmissionFailure(reason))
            }
        }
    }

    pub async fn delete_product(&mut self, sink: &dyn DeletionSink) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Open, "delete the product")?;
        let target_id = self
            .target_id
            .clone()
            .ok_or(SessionError::NoTarget("delete"))?;

        crate::delete_product(sink, &target_id).await?;
        self.close("product deleted");
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Open, "cancel")?;
        self.close("cancelled");
        Ok(())
    }

    fn close(&mut self, reason: &'static str) {
        let released = self.previews.release_all();
        self.state = SessionState::Closed;
        info!(reason, released_previews = released, "edit session closed");
    }

    fn ensure_state(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
