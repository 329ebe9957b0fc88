//! HTTP implementation of the hierarchy service

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::infrastructure::error::{TransportError, TransportResult};
use crate::infrastructure::traits::HierarchyService;

/// Blocking HTTP client for the hierarchy endpoints.
///
/// Sync is a body-less POST, fetch is a GET returning JSON.
#[derive(Debug, Clone)]
pub struct HttpHierarchyService {
    client: Client,
    sync_url: String,
    fetch_url: String,
}

impl HttpHierarchyService {
    pub fn new(api: &ApiConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            sync_url: join_url(&api.base_url, &api.sync_path),
            fetch_url: join_url(&api.base_url, &api.fetch_path),
        })
    }

    pub fn sync_url(&self) -> &str {
        &self.sync_url
    }

    pub fn fetch_url(&self) -> &str {
        &self.fetch_url
    }
}

impl HierarchyService for HttpHierarchyService {
    #[instrument(level = "debug", skip(self), fields(url = %self.sync_url))]
    fn sync_relationships(&self) -> TransportResult<()> {
        let response = self.client.post(&self.sync_url).send()?;
        check_status(&self.sync_url, response.status())?;
        debug!("sync_relationships: {}", response.status());
        Ok(())
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.fetch_url))]
    fn fetch_hierarchy(&self) -> TransportResult<Value> {
        let response = self.client.get(&self.fetch_url).send()?;
        check_status(&self.fetch_url, response.status())?;
        Ok(response.json::<Value>()?)
    }
}

fn check_status(url: &str, status: reqwest::StatusCode) -> TransportResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_slashes_on_both_sides_when_joining_then_single_separator() {
        assert_eq!(
            join_url("http://localhost:8080/", "/api/entities/hierarchy"),
            "http://localhost:8080/api/entities/hierarchy"
        );
        assert_eq!(join_url("http://h", "sync"), "http://h/sync");
    }

    #[test]
    fn given_api_config_when_building_service_then_urls_are_resolved() {
        let api = ApiConfig {
            base_url: "http://localhost:9000/api".into(),
            sync_path: "entities/sync-relationships".into(),
            fetch_path: "entities/hierarchy".into(),
            timeout_secs: 5,
        };
        let service = HttpHierarchyService::new(&api).unwrap();
        assert_eq!(service.sync_url(), "http://localhost:9000/api/entities/sync-relationships");
        assert_eq!(service.fetch_url(), "http://localhost:9000/api/entities/hierarchy");
    }

    #[test]
    fn given_unreachable_host_when_fetching_then_transport_error() {
        let api = ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            ..ApiConfig::default()
        };
        let service = HttpHierarchyService::new(&api).unwrap();
        assert!(service.fetch_hierarchy().is_err());
    }
}
