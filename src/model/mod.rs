//! Document model types for page content representation.
//!
//! Two layers live here: the raw primitives a page extractor hands over
//! ([`RawPage`], [`RawBlock`], [`RawTable`]) and the consolidated form the
//! chunking pipeline consumes ([`Page`], [`Element`]). [`Chunk`] is the
//! pipeline's output.

mod chunk;
mod geometry;
mod page;
mod raw;
mod resource;
mod table;

pub use chunk::{Chunk, ChunkMetadata};
pub use geometry::Rect;
pub use page::{Element, ElementKind, ElementValue, Page};
pub use raw::{RawBlock, RawPage, RawPayload, RawTable};
pub use resource::ImageData;
pub use table::TableGrid;

/// Serde adapter storing byte payloads as standard base64 strings.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
