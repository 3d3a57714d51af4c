pub mod metrics;
pub mod payload;
pub mod providers;
pub mod uploads;

pub use payload::GenerativePart;
pub use uploads::{StagedFile, UploadStore};
