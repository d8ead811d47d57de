use shared::{
    domain::ProductId,
    protocol::{CommitPayload, FileUpload},
};

use crate::{
    error::{Field, ValidationErrors},
    staged::{Origin, StagedImageCollection, Status},
};

/// Raw form inputs as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

impl FormFields {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub fn validate_fields(
    fields: &FormFields,
    collection: &StagedImageCollection,
) -> Result<ValidatedFields, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = non_blank(fields.name.as_ref());
    if name.is_none() {
        errors.push(Field::Name, "Product name is required");
    }

    let price = match non_blank(fields.price.as_ref()) {
        None => {
            errors.push(Field::Price, "Price is required");
            None
        }
        Some(raw) => match raw.parse::<f64>() {
            Ok(price) if !price.is_finite() => {
                errors.push(Field::Price, "Price must be a number");
                None
            }
            Ok(price) if price >= 0.0 => Some(price),
            Ok(_) => {
                errors.push(Field::Price, "Price must be a non-negative amount");
                None
            }
            Err(_) => {
                errors.push(Field::Price, "Price must be a number");
                None
            }
        },
    };

    if collection.active_count() == 0 {
        errors.push(Field::Images, "At least one image is required");
    }

    match (name, price) {
        (Some(name), Some(price)) if errors.is_empty() => Ok(ValidatedFields {
            name: name.to_string(),
            price,
            description: non_blank(fields.description.as_ref()).map(str::to_string),
        }),
        _ => Err(errors),
    }
}

/// Walks the full sequence, hidden entries included: new files become
/// uploads in sequence order and marked entries become deletions.
pub fn build_commit(
    collection: &StagedImageCollection,
    fields: &ValidatedFields,
    target_id: Option<&ProductId>,
) -> CommitPayload {
    let mut files_to_upload = Vec::new();
    let mut ids_to_delete = Vec::new();

    for entry in collection.entries() {
        match (entry.status, &entry.origin) {
            (Status::NewlyAdded, Origin::Local { file }) => files_to_upload.push(FileUpload {
                filename: file.filename.clone(),
                mime_type: file.mime_type.clone(),
                content: file.content.clone(),
            }),
            (Status::MarkedForDeletion, Origin::Existing { .. }) => {
                ids_to_delete.push(entry.id.clone())
            }
            _ => {}
        }
    }

    CommitPayload {
        name: fields.name.clone(),
        price: fields.price,
        description: fields.description.clone(),
        files_to_upload,
        ids_to_delete,
        target_id: target_id.cloned(),
    }
}

pub fn prepare_commit(
    collection: &StagedImageCollection,
    fields: &FormFields,
    target_id: Option<&ProductId>,
) -> Result<CommitPayload, ValidationErrors> {
    let validated = validate_fields(fields, collection)?;
    Ok(build_commit(collection, &validated, target_id))
}

#[cfg(test)]
#[path = "tests/commit_tests.rs"]
mod tests;
