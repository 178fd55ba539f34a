mod price_record;
mod price_response;

pub use price_record::PriceRecord;
pub use price_response::PriceResponse;
