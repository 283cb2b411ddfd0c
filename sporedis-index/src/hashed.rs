use crate::facet::FacetKeyScheme;
use sha2::{Digest, Sha256};
use sporedis_keys::KeyNamer;
use sporedis_model::AttributeValue;

/// Opaque facet keys: `hfs:<hex(sha256("<attribute>,<value>"))>`.
///
/// Key names no longer reveal which attribute values are indexed. Digest
/// collisions are not detected.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedFacets;

impl HashedFacets {
    /// Hex SHA-256 of the attribute/value pair.
    pub fn digest(attribute: &str, value: &AttributeValue) -> String {
        let mut hasher = Sha256::new();
        hasher.update(attribute.as_bytes());
        hasher.update(b",");
        hasher.update(value.canonical().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl FacetKeyScheme for HashedFacets {
    fn name(&self) -> &'static str {
        "hfs"
    }

    fn facet_key(&self, namer: &KeyNamer, attribute: &str, value: &AttributeValue) -> String {
        namer.make_key([self.name().to_string(), Self::digest(attribute, value)])
    }
}
