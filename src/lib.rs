//! Bookshelf application library
//!
//! A catalog of books organized into categories, served over HTTP on top of
//! the bookshelf module framework.

pub mod app;
pub mod modules;
pub mod store;
pub mod utils;
pub mod validation;

pub use app::{build_app, build_registry, StoreBackend};
pub use store::{CatalogStore, SharedStore};
