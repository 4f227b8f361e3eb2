pub mod coin;
pub mod health;
pub mod quote;
pub mod shift;

pub use coin::Coin;
pub use health::HealthStatus;
pub use quote::{AmountInput, LegacyQuoteQuery, Quote, QuoteRequest, QUOTE_VALIDITY_MINUTES};
pub use shift::{FixedShiftRequest, Shift, ShiftStatus};
