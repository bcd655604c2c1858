//! Value formatter: raw provider numbers to display strings.
//!
//! All functions here are pure. Output must stay byte-compatible with the
//! strings existing dashboards already parse (`$2.1T`, `5.12%`, `1.9Sx`).

use cryptorank_market_data::ProviderCoin;

use super::registry::{MetricRegistry, SemanticType};

/// Rendered for magnitudes at or above `i64::MAX`.
pub const OVERFLOW_SENTINEL: &str = "999.99T+";

const SCALE_LARGE: [(f64, &str); 5] = [
    (1e15, "Q"),
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

const SCALE_SUPPLY: [(f64, f64, &str); 7] = [
    (1e23, 1e21, "Sx"),
    (1e20, 1e18, "Qt"),
    (1e17, 1e15, "Qd"),
    (1e14, 1e12, "T"),
    (1e11, 1e9, "B"),
    (1e8, 1e6, "M"),
    (1e5, 1e3, "K"),
];

/// Format a raw value according to its semantic type.
///
/// Total over every `f64`: NaN renders as zero, infinities hit the overflow
/// sentinel (large types) or the plain formatter.
pub fn format_value(raw: f64, semantic_type: SemanticType) -> String {
    let raw = if raw.is_nan() { 0.0 } else { raw };

    match semantic_type {
        SemanticType::CurrencyLarge => format_scaled(raw, "$", false),
        SemanticType::CountLarge => format_scaled(raw, "", true),
        SemanticType::CurrencyPrice => {
            if raw < 0.0 {
                format!("-{}", format_value(-raw, semantic_type))
            } else {
                format!("${:.2}", raw)
            }
        }
        SemanticType::Percentage | SemanticType::PercentageDominance => format!("{:.2}%", raw),
        SemanticType::IntegerRank => format_rank(raw),
        SemanticType::SupplyLarge => format_supply(raw),
    }
}

/// Display value used when the provider omitted the underlying field.
pub fn format_missing(semantic_type: SemanticType) -> String {
    match semantic_type {
        SemanticType::Percentage | SemanticType::PercentageDominance => "0%".to_string(),
        SemanticType::CountLarge | SemanticType::SupplyLarge | SemanticType::IntegerRank => {
            "0".to_string()
        }
        SemanticType::CurrencyLarge => "$0".to_string(),
        SemanticType::CurrencyPrice => "$0.00".to_string(),
    }
}

/// Format the coin's field backing `metric_key`.
///
/// Keys the registry does not know fall back to the currency-price rule
/// applied to the coin's price.
pub fn format_for_metric(coin: &ProviderCoin, metric_key: &str, registry: &MetricRegistry) -> String {
    let Ok(descriptor) = registry.describe(metric_key) else {
        return format_value(coin.price, SemanticType::CurrencyPrice);
    };

    match coin.field(metric_key) {
        Some(raw) => format_value(raw, descriptor.semantic_type),
        None => format_missing(descriptor.semantic_type),
    }
}

fn format_scaled(raw: f64, prefix: &str, with_quadrillion: bool) -> String {
    if raw < 0.0 {
        return format!("-{}", format_scaled(-raw, prefix, with_quadrillion));
    }

    if raw >= i64::MAX as f64 {
        return format!("{}{}", prefix, OVERFLOW_SENTINEL);
    }

    let whole = raw.trunc();
    for (scale, unit) in SCALE_LARGE {
        if unit == "Q" && !with_quadrillion {
            continue;
        }
        if whole >= scale {
            return format!("{}{:.1}{}", prefix, whole / scale, unit);
        }
    }

    format!("{}{}", prefix, whole as i64)
}

fn format_supply(raw: f64) -> String {
    if raw <= 0.0 {
        return "0".to_string();
    }

    for (threshold, divisor, unit) in SCALE_SUPPLY {
        if raw >= threshold {
            return format!("{:.1}{}", raw / divisor, unit);
        }
    }

    format!("{:.0}", raw)
}

fn format_rank(raw: f64) -> String {
    // `as` saturates at the i64 bounds
    (raw.trunc() as i64).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_large() {
        assert_eq!(format_value(1234.0, SemanticType::CurrencyLarge), "$1.2K");
        assert_eq!(format_value(999.0, SemanticType::CurrencyLarge), "$999");
        assert_eq!(format_value(0.0, SemanticType::CurrencyLarge), "$0");
        assert_eq!(
            format_value(2_115_599_321_207.0, SemanticType::CurrencyLarge),
            "$2.1T"
        );
        assert_eq!(
            format_value(35_000_000_000.0, SemanticType::CurrencyLarge),
            "$35.0B"
        );
        assert_eq!(format_value(1.5e15, SemanticType::CurrencyLarge), "$1500.0T");
    }

    #[test]
    fn test_currency_large_negative() {
        assert_eq!(format_value(-1234.0, SemanticType::CurrencyLarge), "-$1.2K");
        assert_eq!(format_value(-42.9, SemanticType::CurrencyLarge), "-$42");
    }

    #[test]
    fn test_overflow_sentinel() {
        assert_eq!(format_value(1e19, SemanticType::CurrencyLarge), "$999.99T+");
        assert_eq!(format_value(1e19, SemanticType::CountLarge), "999.99T+");
        assert_eq!(
            format_value(f64::INFINITY, SemanticType::CountLarge),
            "999.99T+"
        );
        assert_eq!(
            format_value(f64::NEG_INFINITY, SemanticType::CurrencyLarge),
            "-$999.99T+"
        );
    }

    #[test]
    fn test_count_large() {
        assert_eq!(format_value(1_500_000.0, SemanticType::CountLarge), "1.5M");
        assert_eq!(format_value(2.5e15, SemanticType::CountLarge), "2.5Q");
        assert_eq!(format_value(12.0, SemanticType::CountLarge), "12");
    }

    #[test]
    fn test_currency_price() {
        assert_eq!(format_value(106543.214, SemanticType::CurrencyPrice), "$106543.21");
        assert_eq!(format_value(0.5, SemanticType::CurrencyPrice), "$0.50");
        assert_eq!(format_value(-5.0, SemanticType::CurrencyPrice), "-$5.00");
    }

    #[test]
    fn test_percentages() {
        assert_eq!(format_value(5.12, SemanticType::Percentage), "5.12%");
        assert_eq!(format_value(0.0512, SemanticType::Percentage), "0.05%");
        assert_eq!(format_value(-3.9, SemanticType::Percentage), "-3.90%");
        assert_eq!(
            format_value(55.123, SemanticType::PercentageDominance),
            "55.12%"
        );
    }

    #[test]
    fn test_integer_rank_truncates() {
        assert_eq!(format_value(42.0, SemanticType::IntegerRank), "42");
        assert_eq!(format_value(7.9, SemanticType::IntegerRank), "7");
        assert_eq!(format_value(f64::NAN, SemanticType::IntegerRank), "0");
    }

    #[test]
    fn test_supply_ladder() {
        assert_eq!(format_value(0.0, SemanticType::SupplyLarge), "0");
        assert_eq!(format_value(-10.0, SemanticType::SupplyLarge), "0");
        assert_eq!(format_value(99_999.0, SemanticType::SupplyLarge), "99999");
        assert_eq!(format_value(19_700_000.0, SemanticType::SupplyLarge), "19700.0K");
        assert_eq!(format_value(120_000_000.0, SemanticType::SupplyLarge), "120.0M");
        assert_eq!(format_value(5e14, SemanticType::SupplyLarge), "500.0T");
        assert_eq!(format_value(3e17, SemanticType::SupplyLarge), "300.0Qd");
        assert_eq!(format_value(4e20, SemanticType::SupplyLarge), "400.0Qt");

        let sextillions = format_value(2.5e23, SemanticType::SupplyLarge);
        assert!(sextillions.ends_with("Sx"));
        assert_eq!(sextillions, "250.0Sx");
    }

    #[test]
    fn test_missing_defaults() {
        assert_eq!(format_missing(SemanticType::PercentageDominance), "0%");
        assert_eq!(format_missing(SemanticType::CountLarge), "0");
        assert_eq!(format_missing(SemanticType::SupplyLarge), "0");
    }

    #[test]
    fn test_format_for_metric() {
        let registry = MetricRegistry::standard();
        let mut coin = ProviderCoin::new("Bitcoin", "BTC");
        coin.price = 2202.245;
        coin.market_cap = 2_115_599_321_207.0;
        coin.alt_rank = 3;
        coin.interactions_24h = Some(1_234_567.0);

        assert_eq!(format_for_metric(&coin, "market_cap", &registry), "$2.1T");
        assert_eq!(format_for_metric(&coin, "alt_rank", &registry), "3");
        assert_eq!(format_for_metric(&coin, "interactions", &registry), "1.2M");

        // Optional fields the provider left out
        assert_eq!(format_for_metric(&coin, "social_dominance", &registry), "0%");
        assert_eq!(format_for_metric(&coin, "market_dominance", &registry), "0%");
        assert_eq!(format_for_metric(&coin, "circulating_supply", &registry), "0");

        // Unregistered key falls back to the price rule
        assert_eq!(
            format_for_metric(&coin, "galaxy_score", &registry),
            format_value(coin.price, SemanticType::CurrencyPrice)
        );
    }
}
