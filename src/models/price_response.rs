use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use utoipa::ToSchema;

use super::PriceRecord;

/// Body returned by `GET /api/v1/prices`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    #[schema(example = 35455)]
    pub product_id: i64,
    #[schema(example = 1)]
    pub brand_id: i32,
    #[schema(example = 1)]
    pub price_list: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(serialize_with = "serialize_price")]
    #[schema(value_type = f64, example = 35.50)]
    pub price: BigDecimal,
    #[schema(example = "EUR")]
    pub curr: String,
}

/// Writes the amount as a bare JSON number with its stored scale (`35.50`,
/// not `35.5` or `"35.50"`).
fn serialize_price<S: Serializer>(price: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    let raw = RawValue::from_string(price.to_string()).map_err(serde::ser::Error::custom)?;
    raw.serialize(serializer)
}

impl From<PriceRecord> for PriceResponse {
    fn from(record: PriceRecord) -> Self {
        Self {
            product_id: record.product_id,
            brand_id: record.brand_id,
            price_list: record.price_list,
            start_date: record.start_date,
            end_date: record.end_date,
            price: record.price,
            curr: record.curr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::reference_records;

    #[test]
    fn test_price_serializes_as_number_with_scale() {
        let response = PriceResponse::from(reference_records().remove(0));

        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""price":35.50"#), "{}", json);
        assert!(json.contains(r#""priceList":1"#), "{}", json);
    }

    #[test]
    fn test_price_parses_back_as_json_number() {
        let response = PriceResponse::from(reference_records().remove(1));

        let value = serde_json::to_value(&response).unwrap();

        assert!(value["price"].is_number());
        assert_eq!(value["price"].as_f64(), Some(25.45));
        assert_eq!(value["startDate"], "2020-06-14T15:00:00");
    }
}
