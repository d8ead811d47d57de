use std::sync::Arc;

use serde::Serialize;

use crate::domain::{ImageId, ProductId};

pub const FIELD_NAME: &str = "name";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_FILES: &str = "files";
pub const FIELD_IMAGES_TO_DELETE: &str = "imagesToDelete";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_PRODUCT_ID: &str = "productId";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileUpload {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip)]
    pub content: Arc<[u8]>,
}

impl FileUpload {
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// Single combined change for one product. `target_id` absent means create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitPayload {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub files_to_upload: Vec<FileUpload>,
    pub ids_to_delete: Vec<ImageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<ProductId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        upload: FileUpload,
    },
}

impl FormPart {
    pub fn name(&self) -> &'static str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

impl CommitPayload {
    pub fn is_create(&self) -> bool {
        self.target_id.is_none()
    }

    /// Logical multipart parts in backend order: scalars, uploads under one
    /// shared field name, deletion ids as a JSON list, then optional fields.
    pub fn form_parts(&self) -> serde_json::Result<Vec<FormPart>> {
        let mut parts = vec![
            FormPart::Text {
                name: FIELD_NAME,
                value: self.name.clone(),
            },
            FormPart::Text {
                name: FIELD_PRICE,
                value: self.price.to_string(),
            },
        ];

        parts.extend(self.files_to_upload.iter().map(|upload| FormPart::File {
            name: FIELD_FILES,
            upload: upload.clone(),
        }));

        parts.push(FormPart::Text {
            name: FIELD_IMAGES_TO_DELETE,
            value: serde_json::to_string(&self.ids_to_delete)?,
        });

        if let Some(description) = &self.description {
            parts.push(FormPart::Text {
                name: FIELD_DESCRIPTION,
                value: description.clone(),
            });
        }
        if let Some(target_id) = &self.target_id {
            parts.push(FormPart::Text {
                name: FIELD_PRODUCT_ID,
                value: target_id.to_string(),
            });
        }

        Ok(parts)
    }
}
