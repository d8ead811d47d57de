//! Display handles for staged images. Stored images are shown straight from
//! their link; local files get an in-memory handle that lives until released.

use std::{collections::HashMap, sync::Arc};

use shared::domain::ImageId;
use tracing::debug;

use crate::staged::{ImageEntry, Origin};

#[derive(Debug)]
struct PreviewHandle {
    uri: String,
    content: Arc<[u8]>,
}

#[derive(Debug)]
pub struct PreviewResourceManager {
    scheme: String,
    next_sequence: u64,
    handles: HashMap<ImageId, PreviewHandle>,
}

impl PreviewResourceManager {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            next_sequence: 0,
            handles: HashMap::new(),
        }
    }

    pub fn handle_for(&mut self, entry: &ImageEntry) -> String {
        let file = match &entry.origin {
            Origin::Existing { source_link } => return source_link.clone(),
            Origin::Local { file } => file,
        };

        if let Some(handle) = self.handles.get(&entry.id) {
            return handle.uri.clone();
        }

        self.next_sequence += 1;
        let uri = format!("{}://{}/{}", self.scheme, self.next_sequence, entry.id);
        debug!(image = %entry.id, %uri, bytes = file.content.len(), "preview allocated");
        self.handles.insert(
            entry.id.clone(),
            PreviewHandle {
                uri: uri.clone(),
                content: Arc::clone(&file.content),
            },
        );
        uri
    }

    /// Bytes behind a live handle; `None` once the handle has been released.
    pub fn resolve(&self, uri: &str) -> Option<Arc<[u8]>> {
        self.handles
            .values()
            .find(|handle| handle.uri == uri)
            .map(|handle| Arc::clone(&handle.content))
    }

    pub fn release(&mut self, id: &ImageId) {
        if let Some(handle) = self.handles.remove(id) {
            debug!(image = %id, uri = %handle.uri, "preview released");
        }
    }

    pub fn release_all(&mut self) -> usize {
        let released = self.handles.len();
        self.handles.clear();
        if released > 0 {
            debug!(released, "all previews released");
        }
        released
    }

    pub fn outstanding(&self) -> usize {
        self.handles.len()
    }
}

impl Default for PreviewResourceManager {
    fn default() -> Self {
        Self::new("preview")
    }
}

impl Drop for PreviewResourceManager {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
#[path = "tests/preview_tests.rs"]
mod tests;
