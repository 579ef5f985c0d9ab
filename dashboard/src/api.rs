use chrono::NaiveDate;
use entities::dashboard::{CasePrediction, DashboardSnapshot, HistoricalPoint};
use serde::Deserialize;
use shared_kernel::failure::Failure;
use shared_kernel::http_client::HttpClient;
use url::Url;

/// Remote accessor for the dashboard payload:
/// `GET /dashboard?city_id={geocode}`.
pub struct DashboardApi {
    base: Url,
}

#[derive(Deserialize, Debug)]
struct DashboardResponse {
    cidade: CityHeader,
    dados_historicos: Vec<HistoricalRecord>,
    predicao: PredictionRecord,
}

#[derive(Deserialize, Debug)]
struct CityHeader {
    nome: String,
    geocode: String,
    populacao: u64,
}

#[derive(Deserialize, Debug)]
struct HistoricalRecord {
    data: NaiveDate,
    casos: u32,
    temperatura_media: f64,
    umidade_media: f64,
}

#[derive(Deserialize, Debug)]
struct PredictionRecord {
    casos_previstos: u32,
    nivel_risco: String,
    tendencia: String,
}

impl From<DashboardResponse> for DashboardSnapshot {
    fn from(response: DashboardResponse) -> Self {
        DashboardSnapshot {
            geocode: response.cidade.geocode.into(),
            city_name: response.cidade.nome,
            population: response.cidade.populacao,
            history: response
                .dados_historicos
                .into_iter()
                .map(|record| HistoricalPoint {
                    date: record.data,
                    cases: record.casos,
                    mean_temperature: record.temperatura_media,
                    mean_humidity: record.umidade_media,
                })
                .collect(),
            prediction: CasePrediction {
                predicted_cases: response.predicao.casos_previstos,
                risk_level: response.predicao.nivel_risco,
                trend: response.predicao.tendencia,
            },
        }
    }
}

impl DashboardApi {
    pub fn new(base: Url) -> Self {
        DashboardApi { base }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, geocode: &str) -> Result<DashboardSnapshot, Failure> {
        let base = self.base.as_str().trim_end_matches('/');
        let url = Url::parse_with_params(&format!("{base}/dashboard"), &[("city_id", geocode)])
            .map_err(|err| Failure::unknown_with_trace(format!("invalid url: {err}")))?;
        let response = HttpClient::get_json::<DashboardResponse>(url).await?;
        Ok(response.into())
    }
}
