//! Command handlers, grouped by workflow

pub(crate) mod sales;
pub(crate) mod stock;
