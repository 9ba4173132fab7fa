//! Object storage locator canonicalization.
//!
//! Storage locators arrive in several historically grown shapes:
//! virtual-hosted (`https://bucket.s3.region.amazonaws.com/key`), path-style
//! (`https://s3.region.amazonaws.com/bucket/key`), short scheme-prefixed
//! forms (`s3://bucket/key`, `gs3://bucket/key`), the fixed Google Cloud
//! Storage endpoint, or an arbitrary other host. This crate classifies the
//! shape, recovers region and bucket wherever they are embedded, fills the
//! gaps from a prior [`StorageInfo`] record or configured defaults, and
//! re-emits a single canonical path-style `https` locator.
//!
//! [`process_locator`] is the entry point used by the data access layer.
//! [`is_object_storage_url`] is a cheap upfront check for whether a locator
//! is worth processing at all.

mod config;
mod error;
mod info;
mod predicate;
mod process;
mod rebuild;

pub use self::{
    config::{ConfigDefaults, NoDefaults, StaticDefaults},
    error::LocatorError,
    info::{StorageInfo, StorageService},
    predicate::is_object_storage_url,
    process::process_locator,
    rebuild::rebuild_locator,
};
