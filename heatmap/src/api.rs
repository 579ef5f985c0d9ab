use entities::heatmap::{AggregationPeriod, CityRisk, HeatmapSnapshot, RiskCategory};
use serde::Deserialize;
use shared_kernel::failure::Failure;
use shared_kernel::http_client::HttpClient;
use url::Url;

/// Remote accessor for the regional risk picture:
/// `GET /heatmap?state={region}&period={week|month}`.
pub struct HeatmapApi {
    base: Url,
}

#[derive(Deserialize, Debug)]
struct HeatmapResponse {
    estado: String,
    total_cidades: u32,
    periodo: String,
    cidades: Vec<CityHeatRecord>,
}

#[derive(Deserialize, Debug)]
struct CityHeatRecord {
    geocode: String,
    nome: String,
    latitude: f64,
    longitude: f64,
    casos: u32,
    populacao: u64,
    incidencia: f64,
    nivel_risco: String,
}

impl From<CityHeatRecord> for CityRisk {
    fn from(record: CityHeatRecord) -> Self {
        CityRisk {
            geocode: record.geocode.into(),
            name: record.nome,
            latitude: record.latitude,
            longitude: record.longitude,
            cases: record.casos,
            population: record.populacao,
            incidence: record.incidencia,
            risk: RiskCategory::from_wire(&record.nivel_risco),
        }
    }
}

fn period_from_wire(token: &str) -> Result<AggregationPeriod, Failure> {
    match token {
        "week" => Ok(AggregationPeriod::Week),
        "month" => Ok(AggregationPeriod::Month),
        other => Err(Failure::parse(format!("unknown period token `{other}`"))),
    }
}

impl HeatmapApi {
    pub fn new(base: Url) -> Self {
        HeatmapApi { base }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn fetch(
        &self,
        region: &str,
        period: AggregationPeriod,
    ) -> Result<HeatmapSnapshot, Failure> {
        let base = self.base.as_str().trim_end_matches('/');
        let url = Url::parse_with_params(
            &format!("{base}/heatmap"),
            &[("state", region), ("period", period.as_token())],
        )
        .map_err(|err| Failure::unknown_with_trace(format!("invalid url: {err}")))?;

        let response = HttpClient::get_json::<HeatmapResponse>(url).await?;
        Ok(HeatmapSnapshot {
            region: response.estado.into(),
            total_cities: response.total_cidades,
            period: period_from_wire(&response.periodo)?,
            cities: response.cidades.into_iter().map(CityRisk::from).collect(),
        })
    }
}
