//! # IronProto Loader
//!
//! Root loading for the IronProto runtime.
//!
//! This crate provides:
//! - [`Loader`] with synchronous and asynchronous import-graph traversal
//! - The [`Fetch`] and [`Parse`] collaborator traits
//! - Reference fetchers: [`FsFetcher`] and [`MemoryFetcher`]
//! - The bundled well-known-type table ([`bundled`])

pub mod bundled;
pub mod error;
pub mod fetchers;
pub mod load;
pub mod path;
pub mod traits;

pub use error::{FetchError, LoadError, ParseError, Result};
pub use fetchers::{FsFetcher, MemoryFetcher};
pub use load::Loader;
pub use traits::{Fetch, LoadOptions, Parse, ParsedFile};
