use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use catalog_core::{
    commit::FormFields,
    config::{apply_env_overrides, load_settings, load_settings_from},
    events::{EditorView, SessionEvent},
    staged::LocalFile,
    DeletionSink, EditSessionController, SeedSource, SubmissionSink,
};
use clap::Parser;
use serde::Serialize;
use shared::{
    domain::{ImageId, Product, ProductId},
    protocol::{CommitPayload, FormPart},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Stage product edits from the command line and print the resulting commit.
#[derive(Parser, Debug)]
struct Args {
    /// Stored product JSON to edit; omit to create a new product.
    #[arg(long)]
    product: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    cover: Option<PathBuf>,
    #[arg(long = "gallery")]
    gallery: Vec<PathBuf>,
    /// Image id to remove; repeatable.
    #[arg(long = "remove")]
    remove: Vec<String>,
    /// Delete the stored product instead of saving changes.
    #[arg(long)]
    delete_product: bool,
}

struct JsonFileSource {
    path: PathBuf,
}

#[async_trait]
impl SeedSource for JsonFileSource {
    async fn fetch_product(&self, product_id: &ProductId) -> Result<Product> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read product file '{}'", self.path.display()))?;
        let product: Product = serde_json::from_str(&raw)
            .with_context(|| format!("invalid product JSON in '{}'", self.path.display()))?;
        anyhow::ensure!(
            &product.id == product_id,
            "product file holds {} instead of {product_id}",
            product.id
        );
        info!(
            product = %product.id,
            images = product.images.len(),
            cover = product.cover_link().unwrap_or("none"),
            "loaded stored product"
        );
        Ok(product)
    }
}

async fn peek_product_id(path: &Path) -> Result<ProductId> {
    #[derive(serde::Deserialize)]
    struct IdOnly {
        #[serde(rename = "_id")]
        id: ProductId,
    }
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read product file '{}'", path.display()))?;
    let parsed: IdOnly = serde_json::from_str(&raw)
        .with_context(|| format!("product file '{}' has no _id", path.display()))?;
    Ok(parsed.id)
}

#[derive(Serialize)]
struct PartSummary<'a> {
    field: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<usize>,
}

fn summarize(parts: &[FormPart]) -> Vec<PartSummary<'_>> {
    parts
        .iter()
        .map(|part| match part {
            FormPart::Text { name, value } => PartSummary {
                field: *name,
                value: Some(value.as_str()),
                filename: None,
                size_bytes: None,
            },
            FormPart::File { name, upload } => PartSummary {
                field: *name,
                value: None,
                filename: Some(upload.filename.as_str()),
                size_bytes: Some(upload.size_bytes()),
            },
        })
        .collect()
}

/// Prints what would be sent instead of sending it.
struct DryRunSink;

#[async_trait]
impl SubmissionSink for DryRunSink {
    async fn submit(&self, payload: CommitPayload) -> Result<()> {
        let parts = payload.form_parts()?;
        println!("{}", serde_json::to_string_pretty(&summarize(&parts))?);
        Ok(())
    }
}

#[async_trait]
impl DeletionSink for DryRunSink {
    async fn delete_product(&self, product_id: &ProductId) -> Result<()> {
        println!("would delete product {product_id}");
        Ok(())
    }
}

fn print_view(view: &EditorView) {
    if let Some(cover) = &view.cover {
        println!("cover   {} -> {}", cover.id, cover.src);
    }
    for image in &view.gallery {
        println!("gallery {} -> {}", image.id, image.src);
    }
    println!("remaining slots: {}", view.remaining_capacity);
}

fn merge_fields(current: &FormFields, args: &Args) -> FormFields {
    FormFields {
        name: args.name.clone().or_else(|| current.name.clone()),
        price: args.price.clone().or_else(|| current.price.clone()),
        description: args
            .description
            .clone()
            .or_else(|| current.description.clone()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => apply_env_overrides(load_settings_from(path), |key| std::env::var(key).ok()),
        None => load_settings(),
    };
    let mut session = EditSessionController::with_settings(settings);

    match &args.product {
        Some(path) => {
            let product_id = peek_product_id(path).await?;
            let source = JsonFileSource { path: path.clone() };
            session.open_from_source(&source, &product_id).await?;
        }
        None => session.open_create()?,
    }

    if args.delete_product {
        session.delete_product(&DryRunSink).await?;
        return Ok(());
    }

    if let Some(path) = &args.cover {
        session.handle_event(SessionEvent::ChooseCoverFile(LocalFile::from_path(path)?))?;
    }
    if !args.gallery.is_empty() {
        let files = args
            .gallery
            .iter()
            .map(|path| LocalFile::from_path(path))
            .collect::<Result<Vec<_>>>()?;
        session.handle_event(SessionEvent::ChooseGalleryFiles(files))?;
    }
    for id in &args.remove {
        session.handle_event(SessionEvent::DeleteEntry(ImageId::new(id.as_str())))?;
    }
    session.set_fields(merge_fields(session.fields(), &args))?;

    print_view(&session.view());

    if let Err(error) = session.submit(&DryRunSink).await {
        let api_error = error.to_api_error();
        eprintln!("{}", serde_json::to_string_pretty(&api_error)?);
        session.handle_event(SessionEvent::Cancel)?;
        return Err(error.into());
    }
    info!("dry run complete");
    Ok(())
}
