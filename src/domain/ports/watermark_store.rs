//! WatermarkStore port - durable high-water mark persistence

use crate::domain::value_objects::Watermark;
use crate::error::MarginaliaResult;

/// Durable storage for one vault's watermark
pub trait WatermarkStore {
    /// Load the persisted watermark.
    ///
    /// Missing or malformed state yields `Watermark::ZERO`; only other read
    /// failures are errors.
    fn load(&self) -> MarginaliaResult<Watermark>;

    /// Persist the watermark crash-safely (temporary file + atomic rename)
    fn save(&self, watermark: Watermark) -> MarginaliaResult<()>;
}

impl<T: WatermarkStore + ?Sized> WatermarkStore for &T {
    fn load(&self) -> MarginaliaResult<Watermark> {
        (**self).load()
    }

    fn save(&self, watermark: Watermark) -> MarginaliaResult<()> {
        (**self).save(watermark)
    }
}
