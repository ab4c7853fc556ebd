//! Browse add-on collections from an add-ons server
//!
//! The core is [`provider::CollectionProvider`]: it fetches every page of a
//! remote collection, caches the raw payload on disk under a TTL, and maps
//! it into [`amo::CollectionRecord`]s.

pub mod amo;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod provider;
