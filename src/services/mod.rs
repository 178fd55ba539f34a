pub mod price_query_service;
pub mod price_resolver;
