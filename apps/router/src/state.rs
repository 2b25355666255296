use std::sync::Arc;

use anyhow::Result;

use crate::classify::classifier::Classifier;
use crate::classify::destinations::Destinations;
use crate::classify::table::RoutingTable;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup; read-only for the process lifetime.
    pub classifier: Arc<Classifier>,
}

impl AppState {
    /// Loads and validates the routing table, then compiles the classifier.
    pub fn from_config(config: Config) -> Result<Self> {
        let table = RoutingTable::load(config.routing_table_path.as_deref())?;
        let destinations = Destinations::new(&config.static_base_url, &table);
        let classifier = Classifier::new(
            table,
            destinations,
            config.thresholds,
            config.max_input_chars,
        );

        Ok(AppState {
            config,
            classifier: Arc::new(classifier),
        })
    }
}
