//! Product catalog (read side).
//!
//! This crate holds product records with their translated labels and regional
//! offers, and answers translated, region-filtered queries. It is deterministic
//! domain logic: no IO beyond parsing an already-loaded import document.
//! Writes belong to the administrative import that produces the document.

pub mod catalog;
pub mod import;
pub mod product;

pub use catalog::{CatalogError, Label, ProductCatalog, ProductView, UNTRANSLATED};
pub use import::{CatalogDocument, ProductRecord, RegionEntry};
pub use product::{Offer, Product};
