use std::fmt;

use crate::locations::{GeoCode, RegionCode};

/// Externally assigned classification of case incidence. Carried as an
/// opaque string on the wire and parsed here; never recomputed client side
/// from raw incidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// An unrecognized wire value maps to `Low`. Intentional fallback, not
    /// an error.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "baixo" => RiskCategory::Low,
            "medio" => RiskCategory::Medium,
            "alto" => RiskCategory::High,
            _ => RiskCategory::Low,
        }
    }
}

/// Aggregation window for the heatmap. Defaults to the current week and is
/// never restored from persistence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AggregationPeriod {
    #[default]
    Week,
    Month,
}

impl AggregationPeriod {
    pub fn as_token(&self) -> &'static str {
        match self {
            AggregationPeriod::Week => "week",
            AggregationPeriod::Month => "month",
        }
    }
}

impl fmt::Display for AggregationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CityRisk {
    pub geocode: GeoCode,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cases: u32,
    pub population: u64,
    pub incidence: f64,
    pub risk: RiskCategory,
}

/// Geographic risk picture for one administrative region. Replaced
/// wholesale on every successful fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapSnapshot {
    pub region: RegionCode,
    pub total_cities: u32,
    pub period: AggregationPeriod,
    pub cities: Vec<CityRisk>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AggregationPeriod, RiskCategory};

    #[rstest]
    #[case("baixo", RiskCategory::Low)]
    #[case("medio", RiskCategory::Medium)]
    #[case("alto", RiskCategory::High)]
    #[case("muito_alto", RiskCategory::Low)]
    #[case("", RiskCategory::Low)]
    fn wire_values_map_onto_exactly_one_category(
        #[case] wire: &str,
        #[case] expected: RiskCategory,
    ) {
        assert_eq!(RiskCategory::from_wire(wire), expected);
    }

    #[test]
    fn period_tokens_match_the_wire_contract() {
        assert_eq!(AggregationPeriod::Week.as_token(), "week");
        assert_eq!(AggregationPeriod::Month.as_token(), "month");
        assert_eq!(AggregationPeriod::default(), AggregationPeriod::Week);
    }
}
