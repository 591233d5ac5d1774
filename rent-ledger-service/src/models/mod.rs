pub mod record;
pub mod status;

pub use record::{BillingRecord, Category, Month, NewBillingRecord, RecordUpdate, MAX_AMOUNT};
pub use status::{classify, ColorTier, Palette, StatusTier};
