//! `ordermill-inventory` — product records and stock arithmetic.

pub mod product;

pub use product::Product;
