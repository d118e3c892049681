//! Domain layer: pure storefront types and helpers.

pub mod orders;
pub mod paging;
