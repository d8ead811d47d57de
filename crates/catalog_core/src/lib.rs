use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{Product, ProductId},
    protocol::CommitPayload,
};
use tracing::{info, warn};

pub mod commit;
pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod preview;
mod session;
pub mod staged;

pub use error::SessionError;
pub use session::{EditSessionController, SessionMode, SessionState};

/// Loads the stored product an edit session starts from.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_product(&self, product_id: &ProductId) -> Result<Product>;
}

/// Accepts one combined create/update for a product.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: CommitPayload) -> Result<()>;
}

/// Removes a stored product entirely.
#[async_trait]
pub trait DeletionSink: Send + Sync {
    async fn delete_product(&self, product_id: &ProductId) -> Result<()>;
}

/// Standalone product removal, e.g. from a product card outside any edit session.
pub async fn delete_product(
    sink: &dyn DeletionSink,
    product_id: &ProductId,
) -> Result<(), SessionError> {
    match sink.delete_product(product_id).await {
        Ok(()) => {
            info!(product = %product_id, "product deleted");
            Ok(())
        }
        Err(error) => {
            let reason = format!("{error:#}");
            warn!(product = %product_id, %reason, "product deletion rejected");
            Err(SessionError::DeletionFailure(reason))
        }
    }
}
