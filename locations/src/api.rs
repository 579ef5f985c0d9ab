use entities::locations::Location;
use serde::Deserialize;
use shared_kernel::failure::Failure;
use shared_kernel::http_client::HttpClient;
use url::Url;

/// Remote accessor for the city catalogue. One HTTP call per operation,
/// single best-effort attempt; transport causes are folded into the failure
/// taxonomy at this boundary.
pub struct CitiesApi {
    base: Url,
}

/// The backend answers with a mix of English and Portuguese field names
/// depending on its version; both spellings are accepted.
#[derive(Deserialize, Debug)]
pub(crate) struct CityRecord {
    id: String,
    #[serde(alias = "nome")]
    name: String,
    #[serde(alias = "uf")]
    state: String,
    ibge_code: String,
    latitude: f64,
    longitude: f64,
    #[serde(alias = "populacao")]
    population: u64,
}

impl From<CityRecord> for Location {
    fn from(record: CityRecord) -> Self {
        Location {
            id: record.id,
            name: record.name,
            state: record.state.into(),
            ibge_code: record.ibge_code.into(),
            latitude: record.latitude,
            longitude: record.longitude,
            population: record.population,
        }
    }
}

impl CitiesApi {
    pub fn new(base: Url) -> Self {
        CitiesApi { base }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, Failure> {
        let base = self.base.as_str().trim_end_matches('/');
        Url::parse_with_params(&format!("{base}{path}"), params)
            .map_err(|err| Failure::unknown_with_trace(format!("invalid url {base}{path}: {err}")))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Vec<Location>, Failure> {
        let url = self.endpoint("/cities/search", &[("q", query)])?;
        let records = HttpClient::get_json::<Vec<CityRecord>>(url).await?;
        Ok(records.into_iter().map(Location::from).collect())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn find_by_geocode(&self, geocode: &str) -> Result<Location, Failure> {
        let url = self.endpoint(&format!("/cities/{geocode}"), &[])?;
        let record = HttpClient::get_json::<CityRecord>(url).await?;
        Ok(record.into())
    }
}
