// HTTP client for the league dashboard player stats endpoint.
//
// Issues one GET per mode against `{base_url}/leaguedashplayerstats` and turns
// the first result set (`headers` + `rowSet`) into a `Dataset`.

use async_trait::async_trait;
use hoopscore_core::config::{DateRange, FetchSettings};
use hoopscore_core::dataset::Dataset;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::fetcher::{FetchError, FetchRequest, PerMode, StatsFetcher};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const ENDPOINT: &str = "leaguedashplayerstats";
const SERVICE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Filters the endpoint requires but this tool leaves at their neutral value.
const FIXED_PARAMS: &[(&str, &str)] = &[
    ("College", ""),
    ("Conference", ""),
    ("Country", ""),
    ("Division", ""),
    ("DraftPick", ""),
    ("DraftYear", ""),
    ("GameScope", ""),
    ("GameSegment", ""),
    ("Height", ""),
    ("LastNGames", "0"),
    ("LeagueID", "00"),
    ("Location", ""),
    ("MeasureType", "Base"),
    ("Month", "0"),
    ("OpponentTeamID", "0"),
    ("Outcome", ""),
    ("PORound", "0"),
    ("PaceAdjust", "N"),
    ("Period", "0"),
    ("PlayerExperience", ""),
    ("PlayerPosition", ""),
    ("PlusMinus", "N"),
    ("Rank", "N"),
    ("SeasonSegment", ""),
    ("ShotClockRange", ""),
    ("StarterBench", ""),
    ("TeamID", "0"),
    ("VsConference", ""),
    ("VsDivision", ""),
    ("Weight", ""),
];

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    result_sets: Vec<RawResultSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResultSet {
    #[serde(default)]
    name: String,
    headers: Vec<String>,
    row_set: Vec<Vec<Value>>,
}

/// Decode a response body into the dataset of its first result set.
pub fn parse_response(mode: PerMode, body: &[u8]) -> Result<Dataset, FetchError> {
    let raw: RawResponse =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode { mode, source: e })?;
    let set = raw
        .result_sets
        .into_iter()
        .next()
        .ok_or(FetchError::MissingResultSet { mode })?;
    debug!(
        "{mode} result set '{}': {} columns, {} rows",
        set.name,
        set.headers.len(),
        set.row_set.len()
    );
    Dataset::new(set.headers, set.row_set).map_err(|e| FetchError::Shape { mode, source: e })
}

// ---------------------------------------------------------------------------
// NbaStatsClient
// ---------------------------------------------------------------------------

pub struct NbaStatsClient {
    http: reqwest::Client,
    base_url: String,
    season_type: String,
}

impl NbaStatsClient {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            season_type: settings.season_type.clone(),
        })
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}/{ENDPOINT}", self.base_url)
    }

    /// Full query string parameters for one request.
    pub fn query_params(&self, request: &FetchRequest) -> Vec<(&'static str, String)> {
        let (date_from, date_to) = service_dates(&request.date_range);
        let mut params: Vec<(&'static str, String)> = FIXED_PARAMS
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        params.push(("DateFrom", date_from));
        params.push(("DateTo", date_to));
        params.push(("PerMode", request.mode.as_str().to_string()));
        params.push(("Season", request.season.id()));
        params.push(("SeasonType", self.season_type.clone()));
        params
    }
}

fn service_dates(range: &DateRange) -> (String, String) {
    let render = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(SERVICE_DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    (render(range.from), render(range.to))
}

#[async_trait]
impl StatsFetcher for NbaStatsClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<Dataset, FetchError> {
        let mode = request.mode;
        let url = self.endpoint_url();
        debug!("GET {url} PerMode={mode} Season={}", request.season);

        let response = self
            .http
            .get(&url)
            .query(&self.query_params(request))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Http { mode, source: e })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { mode, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http { mode, source: e })?;
        let dataset = parse_response(mode, &body)?;
        info!(
            "Fetched {} {mode} rows for season {}",
            dataset.len(),
            request.season
        );
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hoopscore_core::config::Season;
    use hoopscore_core::dataset::DatasetError;

    fn client() -> NbaStatsClient {
        NbaStatsClient::new(&FetchSettings::default()).unwrap()
    }

    fn request(mode: PerMode, range: DateRange) -> FetchRequest {
        FetchRequest {
            mode,
            season: Season::new(2020),
            date_range: range,
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> &'a str {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing param {key}"))
    }

    #[test]
    fn parses_first_result_set() {
        let body = br#"{
            "resource": "leaguedashplayerstats",
            "resultSets": [{
                "name": "LeagueDashPlayerStats",
                "headers": ["PLAYER_ID", "PLAYER_NAME", "PTS"],
                "rowSet": [[201939, "Stephen Curry", 32.0], [203999, "Nikola Jokic", 26.4]]
            }]
        }"#;
        let ds = parse_response(PerMode::PerGame, body).unwrap();
        assert_eq!(ds.columns(), &["PLAYER_ID", "PLAYER_NAME", "PTS"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.player_ids().unwrap(), vec![201939, 203999]);
    }

    #[test]
    fn empty_result_sets_is_error() {
        let err = parse_response(PerMode::Per36, br#"{"resultSets": []}"#).unwrap_err();
        assert!(matches!(err, FetchError::MissingResultSet { mode: PerMode::Per36 }));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = parse_response(PerMode::PerGame, b"<html>blocked</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn ragged_rows_are_shape_error() {
        let body = br#"{"resultSets": [{"headers": ["A", "B"], "rowSet": [[1]]}]}"#;
        match parse_response(PerMode::PerGame, body).unwrap_err() {
            FetchError::Shape { source, .. } => {
                assert!(matches!(source, DatasetError::RowLength { row: 0, .. }))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn query_params_unbounded() {
        let params = client().query_params(&request(PerMode::Per36, DateRange::unbounded()));
        assert_eq!(param(&params, "PerMode"), "Per36");
        assert_eq!(param(&params, "Season"), "2020-21");
        assert_eq!(param(&params, "SeasonType"), "Regular Season");
        assert_eq!(param(&params, "MeasureType"), "Base");
        assert_eq!(param(&params, "DateFrom"), "");
        assert_eq!(param(&params, "DateTo"), "");
    }

    #[test]
    fn query_params_render_service_dates() {
        let range = DateRange::parse("2021-01-01", "2021-02-01").unwrap();
        let params = client().query_params(&request(PerMode::PerGame, range));
        assert_eq!(param(&params, "DateFrom"), "01/01/2021");
        assert_eq!(param(&params, "DateTo"), "02/01/2021");
    }

    #[test]
    fn endpoint_url_trims_trailing_slash() {
        let settings = FetchSettings {
            base_url: "http://localhost:8080/stats/".into(),
            ..FetchSettings::default()
        };
        let client = NbaStatsClient::new(&settings).unwrap();
        assert_eq!(
            client.endpoint_url(),
            "http://localhost:8080/stats/leaguedashplayerstats"
        );
    }
}
