use crate::error::AppError;

/// Seam for the avatar image pipeline.
///
/// The core accepts opaque image bytes, hands them to the processor, and
/// stores whatever comes back; decode and resize live behind this trait.
pub trait AvatarProcessor: Send + Sync {
    fn process(&self, bytes: &[u8]) -> Result<Vec<u8>, AppError>;
}

/// Stores uploads unchanged.
pub struct PassthroughAvatarProcessor;

impl AvatarProcessor for PassthroughAvatarProcessor {
    fn process(&self, bytes: &[u8]) -> Result<Vec<u8>, AppError> {
        Ok(bytes.to_vec())
    }
}
