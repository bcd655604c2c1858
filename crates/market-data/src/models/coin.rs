use serde::{Deserialize, Deserializer, Serialize};

/// Envelope returned by the coin list endpoint: `{ "data": [ ... ] }`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CoinListResponse {
    #[serde(default)]
    pub data: Vec<ProviderCoin>,
}

/// One coin record as the provider returns it.
///
/// Fields the provider always sends decode to their zero value when absent or
/// `null`. The social and supply figures stay `None` so callers can tell
/// "missing" from "zero".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderCoin {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume_24h: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub percent_change_1h: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub percent_change_24h: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub percent_change_7d: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alt_rank: i64,

    // Social metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_dominance: Option<f64>,

    // Supply metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_dominance: Option<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProviderCoin {
    /// Creates a coin with only its identity set.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Raw value of the provider field backing a sort key.
    ///
    /// Returns `None` for optional fields the provider left out and for keys
    /// that have no backing field.
    pub fn field(&self, sort: &str) -> Option<f64> {
        match sort {
            "market_cap" => Some(self.market_cap),
            "price" => Some(self.price),
            "volume_24h" => Some(self.volume_24h),
            "percent_change_1h" => Some(self.percent_change_1h),
            "percent_change_24h" => Some(self.percent_change_24h),
            "percent_change_7d" => Some(self.percent_change_7d),
            "alt_rank" => Some(self.alt_rank as f64),
            "interactions" | "interactions_24h" => self.interactions_24h,
            "social_dominance" => self.social_dominance,
            "circulating_supply" => self.circulating_supply,
            "market_dominance" => self.market_dominance,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_full_record() {
        let json = r#"{
            "id": 1,
            "symbol": "BTC",
            "name": "Bitcoin",
            "price": 106543.21,
            "market_cap": 2115599321207,
            "volume_24h": 35000000000,
            "percent_change_1h": 0.12,
            "percent_change_24h": -3.9,
            "percent_change_7d": 5.5,
            "alt_rank": 42,
            "interactions_24h": 1500000,
            "social_dominance": 21.5,
            "circulating_supply": 19700000,
            "market_dominance": 55.1
        }"#;
        let coin: ProviderCoin = serde_json::from_str(json).unwrap();
        assert_eq!(coin.name, "Bitcoin");
        assert_eq!(coin.symbol, "BTC");
        assert_eq!(coin.alt_rank, 42);
        assert_eq!(coin.field("market_cap"), Some(2_115_599_321_207.0));
        assert_eq!(coin.field("interactions"), Some(1_500_000.0));
        assert_eq!(coin.field("alt_rank"), Some(42.0));
    }

    #[test]
    fn test_missing_optional_fields_stay_none() {
        let json = r#"{"symbol": "ETH", "name": "Ethereum", "price": 2202.24}"#;
        let coin: ProviderCoin = serde_json::from_str(json).unwrap();
        assert_eq!(coin.market_cap, 0.0);
        assert_eq!(coin.field("social_dominance"), None);
        assert_eq!(coin.field("circulating_supply"), None);
        assert_eq!(coin.field("price"), Some(2202.24));
    }

    #[test]
    fn test_null_fields_decode_as_zero() {
        let json = r#"{"data": [
            {"id": 1, "symbol": "BTC", "name": "Bitcoin", "price": 106543.21, "market_cap": null, "alt_rank": null},
            {"id": null, "symbol": null, "name": null, "price": 2.1, "social_dominance": null}
        ]}"#;
        let response: CoinListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 2);

        let btc = &response.data[0];
        assert_eq!(btc.market_cap, 0.0);
        assert_eq!(btc.alt_rank, 0);
        assert_eq!(btc.field("price"), Some(106543.21));

        let unnamed = &response.data[1];
        assert_eq!(unnamed.id, 0);
        assert_eq!(unnamed.name, "");
        assert_eq!(unnamed.symbol, "");
        assert_eq!(unnamed.field("social_dominance"), None);
    }

    #[test]
    fn test_unknown_field_key() {
        let coin = ProviderCoin::new("Bitcoin", "BTC");
        assert_eq!(coin.field("galaxy_score"), None);
    }

    #[test]
    fn test_envelope_defaults_to_empty() {
        let response: CoinListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
    }
}
