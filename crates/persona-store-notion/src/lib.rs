//! Notion backend for the persona store.
//!
//! Maps the [`persona_core::store::PersonaStore`] operations onto the Notion
//! REST API: persona pages in a root database, one child database per
//! persona as its history log, and file uploads for entry contents. Nothing
//! outside this crate touches the wire format.

mod decode;
mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{NotionConfig, NotionStore};
