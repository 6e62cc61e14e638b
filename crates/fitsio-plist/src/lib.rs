//! Codec between FITS header cards and typed property lists.
//!
//! [`load`] reads the cards of one HDU from a [`HeaderSource`] into a
//! [`PropertyList`]; [`serialize`] writes a list back through a
//! [`HeaderSink`]. [`HeaderBuffer`] and [`CardWriter`] are the in-memory
//! source and sink.

pub mod block;
pub mod buffer;
pub mod card;
pub mod dictionary;
pub mod error;
pub mod filter;
pub mod list;
pub mod loader;
pub mod property;
pub mod serializer;
pub mod source;
pub mod unique;
pub mod wcs;
pub mod writer;

pub use block::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
pub use buffer::HeaderBuffer;
pub use error::{Error, ErrorCode, Result};
pub use filter::Filter;
pub use list::PropertyList;
pub use loader::load;
pub use property::{Property, PropertyType, Value};
pub use serializer::serialize;
pub use source::{Commentary, HeaderSink, HeaderSource, KeyMode};
pub use writer::CardWriter;
