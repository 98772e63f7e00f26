//! Public entry point: validate, dispatch, return a well-formed result.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::cache::ModelCache;
use crate::engine::ForecastEngine;
use crate::router::{ProxyRouter, RoutingTable};
use crate::result::ForecastResult;
use crate::validate::RequestValidator;
use crate::variant::ModelFamily;

/// The only component exposed to callers. Cache, engine and router are reachable through it.
#[derive(Clone)]
pub struct PublicEndpoint {
    validator: RequestValidator,
    engine: ForecastEngine,
    router: ProxyRouter,
}

impl PublicEndpoint {
    pub fn new(validator: RequestValidator, engine: ForecastEngine, table: RoutingTable) -> Self {
        let router = ProxyRouter::new(table, engine.clone());
        Self {
            validator,
            engine,
            router,
        }
    }

    /// Endpoint with default validation and the standard routing table.
    pub fn with_cache(cache: Arc<ModelCache>) -> Self {
        Self::new(
            RequestValidator::default(),
            ForecastEngine::new(cache),
            RoutingTable::standard(),
        )
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        self.engine.cache()
    }

    /// Handles one request for `family`. Rejections never reach the cache or the engine.
    pub async fn handle(&self, family: ModelFamily, payload: &Value) -> ForecastResult {
        let request = match self.validator.validate(payload, family) {
            Ok(r) => r,
            Err(e) => {
                warn!(family = %family, error = %e, "request rejected");
                return ForecastResult::failed(e);
            }
        };
        if self.router.table().contains(family) {
            self.router.route(&request).await
        } else {
            self.engine.forecast(&request).await
        }
    }
}
