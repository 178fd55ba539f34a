use crate::services::price_query_service::PriceQueryService;

/// Process-wide state, built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub prices: PriceQueryService,
}

impl AppState {
    pub fn new(prices: PriceQueryService) -> Self {
        Self { prices }
    }
}
