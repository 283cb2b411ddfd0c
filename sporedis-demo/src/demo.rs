use crate::samples::{sample_customers, sample_events};
use crate::SporedisConfig;
use anyhow::{Context, Result};
use sporedis_index::{Catalog, FacetIndex, Predicate};
use sporedis_keys::KeyNamer;
use sporedis_model::{customer_schema, event_schema, Record};
use sporedis_store::{RecordStore, StoreClient};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Customers plus an event catalog with plain and hashed facet indexes.
pub struct Demo {
    client: StoreClient,
    customers: RecordStore,
    events: Catalog,
}

/// Everything the demo prints, in order.
#[derive(Debug)]
pub struct DemoReport {
    pub customers: Vec<Record>,
    pub event: Record,
    pub greedy_budokan: Vec<String>,
    pub facet_budokan: HashSet<String>,
    pub hashed_olympic: HashSet<String>,
}

impl Demo {
    /// Connects to the configured backend and attaches both facet indexes.
    pub async fn open(config: &SporedisConfig) -> Result<Self> {
        let namer = KeyNamer::new(config.keys.clone()).context("Invalid key configuration")?;
        let client = sporedis_store::connect(&config.store)
            .await
            .context("Failed to open store")?;

        let lookup = &config.index.lookup_attributes;
        let customers = RecordStore::new(customer_schema(), namer.clone(), client.clone());
        let events = Catalog::new(RecordStore::new(event_schema(), namer.clone(), client.clone()))
            .with_index(Arc::new(FacetIndex::plain(
                lookup.iter().cloned(),
                namer.clone(),
                client.clone(),
            )))
            .with_index(Arc::new(FacetIndex::hashed(
                lookup.iter().cloned(),
                namer,
                client.clone(),
            )));

        Ok(Self {
            client,
            customers,
            events,
        })
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    pub fn customers(&self) -> &RecordStore {
        &self.customers
    }

    pub fn events(&self) -> &Catalog {
        &self.events
    }

    /// Stores the sample customers and events, indexing the events.
    pub async fn load_samples(&self) -> Result<()> {
        let customers = sample_customers().context("Invalid sample customer")?;
        for customer in &customers {
            self.customers.put(customer).await?;
        }
        let events = sample_events().context("Invalid sample event")?;
        for event in &events {
            self.events.put(event).await?;
        }
        info!("Loaded {} customers and {} events", customers.len(), events.len());
        Ok(())
    }

    /// Runs the lookups over loaded samples.
    pub async fn run(&self) -> Result<DemoReport> {
        let mut customers = self.customers.get(&["*"]).await?;
        customers.sort_by(|a, b| a.id().cmp(b.id()));

        let event = self
            .events
            .get("123-ABC-723")
            .await
            .context("Sample event 123-ABC-723 missing")?;

        let budokan = [
            Predicate::new("disabled_access", false),
            Predicate::new("medal_event", false),
            Predicate::new("venue", "Nippon Budokan"),
        ];
        let olympic = [
            Predicate::new("disabled_access", true),
            Predicate::new("medal_event", false),
            Predicate::new("venue", "Olympic Stadium"),
        ];

        Ok(DemoReport {
            customers,
            event,
            greedy_budokan: self.events.search_greedy(&budokan).await?,
            facet_budokan: self.events.query("fs", &budokan).await?,
            hashed_olympic: self.events.query("hfs", &olympic).await?,
        })
    }
}
