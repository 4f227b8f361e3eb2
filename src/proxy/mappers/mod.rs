// Mappers module - client contract → exchange contract

pub mod sideshift;

pub use sideshift::{
    map_fixed_shift_request, map_quote_request, UpstreamFixedShiftRequest, UpstreamQuoteRequest,
};
