use chrono::NaiveDate;

use crate::locations::GeoCode;

/// One week of observed surveillance data.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub cases: u32,
    pub mean_temperature: f64,
    pub mean_humidity: f64,
}

/// The backend's short term projection for the selected municipality.
#[derive(Clone, Debug, PartialEq)]
pub struct CasePrediction {
    pub predicted_cases: u32,
    pub risk_level: String,
    pub trend: String,
}

/// Everything the dashboard renders for one municipality. Replaced
/// wholesale on every successful fetch, never merged or patched. Derived
/// quantities are computed on read and never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSnapshot {
    pub geocode: GeoCode,
    pub city_name: String,
    pub population: u64,
    pub history: Vec<HistoricalPoint>,
    pub prediction: CasePrediction,
}

impl DashboardSnapshot {
    pub fn total_confirmed(&self) -> u64 {
        self.history.iter().map(|point| u64::from(point.cases)).sum()
    }

    pub fn current_week(&self) -> Option<&HistoricalPoint> {
        self.history.last()
    }

    /// Week over week delta of case counts. With fewer than two historical
    /// points this is the current week's count itself.
    pub fn new_cases_this_week(&self) -> i64 {
        match self.history.as_slice() {
            [] => 0,
            [only] => i64::from(only.cases),
            [.., previous, current] => i64::from(current.cases) - i64::from(previous.cases),
        }
    }
}
