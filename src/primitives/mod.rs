//! Operation handles exposed on [`crate::Stockguard`]

mod sales;
mod stock;

pub use sales::Sales;
pub use stock::Stock;
