//! Set-per-value facet indexes.
//!
//! For every lookup attribute a record carries, the record's id is added to
//! the set stored at that attribute/value's facet key. A query intersects the
//! sets of all its predicates.

use crate::hashed::HashedFacets;
use crate::Predicate;
use async_trait::async_trait;
use sporedis_keys::KeyNamer;
use sporedis_model::{AttributeValue, Record};
use sporedis_store::{Deadline, StoreClient, StoreError, StoreResult};
use std::collections::HashSet;
use tracing::debug;

/// Derives the key of the set holding ids for one attribute/value pair.
pub trait FacetKeyScheme: Send + Sync {
    /// Short name, also used as the first key part.
    fn name(&self) -> &'static str;

    fn facet_key(&self, namer: &KeyNamer, attribute: &str, value: &AttributeValue) -> String;
}

/// Human-readable facet keys: `fs:<attribute>:<value>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFacets;

impl FacetKeyScheme for PlainFacets {
    fn name(&self) -> &'static str {
        "fs"
    }

    fn facet_key(&self, namer: &KeyNamer, attribute: &str, value: &AttributeValue) -> String {
        namer.make_key([self.name(), attribute, value.canonical().as_ref()])
    }
}

/// Index operations shared by every facet index, object-safe so a
/// [`crate::Catalog`] can hold a mix of them.
#[async_trait]
pub trait FacetSearch: Send + Sync {
    fn name(&self) -> &str;

    /// Adds `entity_id` to the facet entry of each lookup attribute present
    /// on `record`. Returns the number of entries written.
    async fn index(&self, entity_id: &str, record: &Record) -> StoreResult<usize>;

    /// Removes `entity_id` from the facet entries `record` contributes to.
    async fn unindex(&self, entity_id: &str, record: &Record) -> StoreResult<usize>;

    /// Moves `entity_id` from `previous`'s facet entries to `current`'s,
    /// touching only attributes whose value changed.
    async fn reindex(
        &self,
        entity_id: &str,
        previous: Option<&Record>,
        current: &Record,
    ) -> StoreResult<()>;

    /// Ids present in the facet entry of every predicate.
    async fn query(&self, predicates: &[Predicate]) -> StoreResult<HashSet<String>>;
}

/// A facet index over a fixed list of lookup attributes.
#[derive(Clone)]
pub struct FacetIndex<S = PlainFacets> {
    lookup_attributes: Vec<String>,
    namer: KeyNamer,
    client: StoreClient,
    scheme: S,
}

/// Facet index whose keys are digests of the attribute/value pair.
pub type HashedFacetIndex = FacetIndex<HashedFacets>;

impl FacetIndex<PlainFacets> {
    /// Index with readable `fs:` keys.
    pub fn plain<I, A>(lookup_attributes: I, namer: KeyNamer, client: StoreClient) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::with_scheme(lookup_attributes, namer, client, PlainFacets)
    }
}

impl FacetIndex<HashedFacets> {
    /// Index with opaque `hfs:` keys.
    pub fn hashed<I, A>(lookup_attributes: I, namer: KeyNamer, client: StoreClient) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::with_scheme(lookup_attributes, namer, client, HashedFacets)
    }
}

impl<S: FacetKeyScheme> FacetIndex<S> {
    pub fn with_scheme<I, A>(lookup_attributes: I, namer: KeyNamer, client: StoreClient, scheme: S) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            lookup_attributes: lookup_attributes.into_iter().map(Into::into).collect(),
            namer,
            client,
            scheme,
        }
    }

    #[must_use]
    pub fn with_deadline(&self, deadline: Deadline) -> Self
    where
        S: Clone,
    {
        Self {
            lookup_attributes: self.lookup_attributes.clone(),
            namer: self.namer.clone(),
            client: self.client.with_deadline(deadline),
            scheme: self.scheme.clone(),
        }
    }

    pub fn lookup_attributes(&self) -> &[String] {
        &self.lookup_attributes
    }

    pub fn facet_key(&self, attribute: &str, value: &AttributeValue) -> String {
        self.scheme.facet_key(&self.namer, attribute, value)
    }

    /// Facet keys for each lookup attribute present on `record`.
    fn entries<'r>(&'r self, record: &'r Record) -> impl Iterator<Item = String> + 'r {
        self.lookup_attributes.iter().filter_map(move |attr| {
            record.get(attr).map(|value| self.facet_key(attr, value))
        })
    }

    pub async fn index(&self, entity_id: &str, record: &Record) -> StoreResult<usize> {
        let keys: Vec<String> = self.entries(record).collect();
        for key in &keys {
            self.client.sadd(key, entity_id).await?;
        }
        debug!("{}: indexed {} under {} facet(s)", self.scheme.name(), entity_id, keys.len());
        Ok(keys.len())
    }

    pub async fn unindex(&self, entity_id: &str, record: &Record) -> StoreResult<usize> {
        let keys: Vec<String> = self.entries(record).collect();
        let mut removed = 0;
        for key in &keys {
            if self.client.srem(key, entity_id).await? {
                removed += 1;
            }
        }
        debug!("{}: removed {} from {} facet(s)", self.scheme.name(), entity_id, removed);
        Ok(removed)
    }

    pub async fn reindex(
        &self,
        entity_id: &str,
        previous: Option<&Record>,
        current: &Record,
    ) -> StoreResult<()> {
        for attr in &self.lookup_attributes {
            let old = previous.and_then(|p| p.get(attr));
            let new = current.get(attr);
            if let Some(old) = old.filter(|o| Some(*o) != new) {
                self.client.srem(&self.facet_key(attr, old), entity_id).await?;
            }
            if let Some(new) = new {
                self.client.sadd(&self.facet_key(attr, new), entity_id).await?;
            }
        }
        Ok(())
    }

    /// Intersects the facet entries of all `predicates`.
    ///
    /// An empty predicate list is rejected with [`StoreError::EmptyQuery`].
    /// Predicates on attributes outside the lookup list match nothing.
    pub async fn query(&self, predicates: &[Predicate]) -> StoreResult<HashSet<String>> {
        if predicates.is_empty() {
            return Err(StoreError::EmptyQuery);
        }
        let keys: Vec<String> = predicates
            .iter()
            .map(|p| self.facet_key(&p.attribute, &p.value))
            .collect();
        self.client.sinter(&keys).await
    }
}

#[async_trait]
impl<S: FacetKeyScheme> FacetSearch for FacetIndex<S> {
    fn name(&self) -> &str {
        self.scheme.name()
    }

    async fn index(&self, entity_id: &str, record: &Record) -> StoreResult<usize> {
        FacetIndex::index(self, entity_id, record).await
    }

    async fn unindex(&self, entity_id: &str, record: &Record) -> StoreResult<usize> {
        FacetIndex::unindex(self, entity_id, record).await
    }

    async fn reindex(
        &self,
        entity_id: &str,
        previous: Option<&Record>,
        current: &Record,
    ) -> StoreResult<()> {
        FacetIndex::reindex(self, entity_id, previous, current).await
    }

    async fn query(&self, predicates: &[Predicate]) -> StoreResult<HashSet<String>> {
        FacetIndex::query(self, predicates).await
    }
}
