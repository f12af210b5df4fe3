//! Checkout
//!
//! - [`build_order`] - validated, priced order with its summary text
//! - [`build_novel_request`] / [`render_catalog`] - novel catalog messages

mod assembly;
mod novel_request;
mod summary;

pub use assembly::{
    OrderRejected, OrderValidationError, build_order, build_order_from_state, validate_checkout,
};
pub use novel_request::{NovelRequestError, build_novel_request, render_catalog};
pub use summary::{format_amount, format_es_datetime, render_order_summary};
