use lazy_static::lazy_static;
use serde::Deserialize;
use shared_kernel::configuration::config;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub heatmap: HeatmapSettings,
    pub predictions: PredictionSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Backend base, including the versioned prefix, e.g.
    /// `http://localhost:8000/api/v1`.
    pub host: String,
    /// Endpoint the connectivity probe HEADs before remote calls.
    pub probe_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HeatmapSettings {
    pub default_region: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionSettings {
    pub weeks_ahead: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// When unset, the platform data directory is used.
    pub directory: Option<String>,
}

lazy_static! {
    pub static ref SETTINGS_CONFIG: Settings = config::<Settings>().expect("settings to be defined");
}

#[cfg(test)]
mod tests {
    use shared_kernel::configuration::config;
    use url::Url;

    use super::Settings;

    #[test]
    fn the_checked_in_configuration_parses() {
        let settings = config::<Settings>().unwrap();
        assert!(Url::parse(&settings.api.host).is_ok());
        assert!(Url::parse(&settings.api.probe_url).is_ok());
        assert!(!settings.heatmap.default_region.is_empty());
        assert!(settings.predictions.weeks_ahead > 0);
    }
}
