//! Wire types for the THORNode REST API, as consumed by the swap client
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod serialization;
mod types;
pub use types::*;
