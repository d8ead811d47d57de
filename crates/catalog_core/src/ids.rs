use shared::domain::ImageId;
use uuid::Uuid;

/// Source of identities for locally added images.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> ImageId;
}

/// Random ids for interactive sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> ImageId {
        ImageId(format!("local-{}", Uuid::new_v4().simple()))
    }
}

/// Deterministic `local-1`, `local-2`, ... ids.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ImageId {
        self.next += 1;
        ImageId(format!("local-{}", self.next))
    }
}
