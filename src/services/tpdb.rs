//! ThePornDB API client for scene search
//!
//! Base URL: https://api.theporndb.net
//!
//! Only the free-text scene search is used: `GET /scenes?q=<query>` with a
//! bearer token. Responses are `{"data": [scene, ...]}`.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::catalog::{CandidateRecord, SceneSearch, SearchFailure};
use super::rate_limiter::RateLimitedClient;

pub const DEFAULT_BASE_URL: &str = "https://api.theporndb.net";
pub const DEFAULT_SCENE_URL_BASE: &str = "https://theporndb.net/scenes";
pub const USER_AGENT: &str = "PreDB-TPDb-Updater/1.0";

pub struct TpdbClient {
    client: RateLimitedClient,
    base_url: String,
}

impl TpdbClient {
    pub fn new(client: RateLimitedClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SceneSearch for TpdbClient {
    fn name(&self) -> &str {
        "tpdb"
    }

    async fn search(&self, query: &str, token: &str) -> Result<Vec<CandidateRecord>, SearchFailure> {
        let url = format!("{}/scenes", self.base_url);
        let auth = format!("Bearer {token}");
        let headers = [("Authorization", auth.as_str()), ("Accept", "application/json")];

        let response = self
            .client
            .get_with_headers_and_query(&url, &headers, &[("q", query)])
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(SearchFailure::RateLimited);
        }
        if !response.status().is_success() {
            return Err(SearchFailure::Http { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;
        let candidates = decode_search_response(&body)?;

        debug!(query = %query, count = candidates.len(), "TPDB search returned results");
        Ok(candidates)
    }
}

pub fn decode_search_response(body: &str) -> Result<Vec<CandidateRecord>, SearchFailure> {
    let response: TpdbSearchResponse =
        serde_json::from_str(body).map_err(|e| SearchFailure::Decode(e.to_string()))?;
    Ok(response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(TpdbScene::into_candidate)
        .collect())
}

#[derive(Debug, Deserialize)]
struct TpdbSearchResponse {
    #[serde(default)]
    data: Option<Vec<TpdbScene>>,
}

/// Scene ids arrive as strings or numbers depending on the endpoint version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TpdbId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
struct TpdbSite {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TpdbPerformer {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TpdbTag {
    Named { name: String },
    Plain(String),
    Other(serde::de::IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct TpdbScene {
    #[serde(default)]
    id: Option<TpdbId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    site: Option<TpdbSite>,
    #[serde(default)]
    performers: Option<Vec<TpdbPerformer>>,
    #[serde(default)]
    tags: Option<Vec<TpdbTag>>,
    #[serde(default)]
    duration: Option<serde_json::Value>,
}

fn parse_scene_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_duration(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|d| *d >= 0.0).map(|d| d as u64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl TpdbScene {
    fn into_candidate(self) -> CandidateRecord {
        let id = match self.id {
            Some(TpdbId::Text(s)) => s,
            Some(TpdbId::Number(n)) => n.to_string(),
            None => String::new(),
        };

        let mut performer_names: Vec<String> = Vec::new();
        for name in self
            .performers
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.name)
            .filter(|n| !n.is_empty())
        {
            if !performer_names.contains(&name) {
                performer_names.push(name);
            }
        }

        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags.unwrap_or_default() {
            let name = match tag {
                TpdbTag::Named { name } | TpdbTag::Plain(name) => name,
                TpdbTag::Other(_) => continue,
            };
            if !name.is_empty() && !tags.contains(&name) {
                tags.push(name);
            }
        }

        CandidateRecord {
            id,
            title: self.title.unwrap_or_default(),
            date: self.date.as_deref().and_then(parse_scene_date),
            site_name: self.site.and_then(|s| s.name).unwrap_or_default(),
            performer_names,
            tags,
            duration: self.duration.as_ref().and_then(parse_duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_full_scene() {
        let body = r#"{
            "data": [{
                "id": "abc-123",
                "title": "Scene Title",
                "date": "2024-03-15",
                "site": {"name": "Big Studio"},
                "performers": [{"name": "Jane Doe"}, {"name": "Jane Doe"}, {"name": "John Roe"}],
                "tags": [{"name": "Pool"}, "Outdoor", {"id": 9}],
                "duration": 1834
            }]
        }"#;
        let candidates = decode_search_response(body).unwrap();
        assert_eq!(
            candidates,
            vec![CandidateRecord {
                id: "abc-123".into(),
                title: "Scene Title".into(),
                date: NaiveDate::from_ymd_opt(2024, 3, 15),
                site_name: "Big Studio".into(),
                performer_names: vec!["Jane Doe".into(), "John Roe".into()],
                tags: vec!["Pool".into(), "Outdoor".into()],
                duration: Some(1834),
            }]
        );
    }

    #[test]
    fn test_decode_sparse_scene() {
        let body = r#"{"data": [{"id": 42, "date": "not a date", "performers": null, "duration": null}]}"#;
        let candidates = decode_search_response(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "42");
        assert_eq!(candidates[0].date, None);
        assert!(candidates[0].performer_names.is_empty());
        assert_eq!(candidates[0].duration, None);
    }

    #[test]
    fn test_decode_timestamp_date() {
        assert_eq!(parse_scene_date("2023-11-30T00:00:00Z"), NaiveDate::from_ymd_opt(2023, 11, 30));
    }

    #[test]
    fn test_decode_empty_and_invalid() {
        assert!(decode_search_response(r#"{"data": []}"#).unwrap().is_empty());
        assert!(decode_search_response(r#"{}"#).unwrap().is_empty());
        assert!(matches!(
            decode_search_response("<html>"),
            Err(SearchFailure::Decode(_))
        ));
    }
}
