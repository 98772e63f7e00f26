//! Substitution routing for model families without a production implementation.
//!
//! A [`RoutingTable`] maps a requested family onto a concrete (family, size) stand-in and
//! the label reported to callers. Relabeling is a pure post-processing step on success.

use std::collections::HashMap;

use tracing::info;

use crate::engine::ForecastEngine;
use crate::request::ForecastRequest;
use crate::result::ForecastResult;
use crate::variant::{ModelFamily, ModelSize};

/// Stand-in used for a routed family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub family: ModelFamily,
    pub size: ModelSize,
    /// Replaces `model` in successful results so callers can see the substitution.
    pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    routes: HashMap<ModelFamily, Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, from: ModelFamily, route: Route) -> Self {
        self.routes.insert(from, route);
        self
    }

    pub fn get(&self, family: ModelFamily) -> Option<&Route> {
        self.routes.get(&family)
    }

    pub fn contains(&self, family: ModelFamily) -> bool {
        self.routes.contains_key(&family)
    }

    /// TimesFM is served by Chronos `base` until a native implementation exists.
    pub fn standard() -> Self {
        Self::new().with_route(
            ModelFamily::TimesFm,
            Route {
                family: ModelFamily::Chronos,
                size: ModelSize::Base,
                label: "TimesFM (via Chronos proxy)".to_string(),
            },
        )
    }
}

/// Redirects requests for routed families to their stand-in through the engine.
#[derive(Clone)]
pub struct ProxyRouter {
    table: RoutingTable,
    engine: ForecastEngine,
}

impl ProxyRouter {
    pub fn new(table: RoutingTable, engine: ForecastEngine) -> Self {
        Self { table, engine }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Serves `request` via its family's stand-in. Failures pass through unmodified;
    /// a family without a route goes to the engine as requested.
    pub async fn route(&self, request: &ForecastRequest) -> ForecastResult {
        let Some(route) = self.table.get(request.family) else {
            return self.engine.forecast(request).await;
        };
        info!(
            requested = %request.family,
            family = %route.family,
            size = %route.size,
            "serving via substitute model"
        );
        let substitute = ForecastRequest {
            family: route.family,
            size: route.size,
            ..request.clone()
        };
        self.engine
            .forecast(&substitute)
            .await
            .relabeled(&route.label)
    }
}
