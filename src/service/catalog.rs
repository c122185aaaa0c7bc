//! Machine-readable description of a service's routes

use serde::Serialize;
use std::path::Path;

use crate::errors::RouteHausError;
use crate::handler::HandlerDescriptor;
use crate::http::HttpMethod;

#[derive(Debug, Clone, Serialize)]
pub struct ApiCatalog {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub routes: Vec<RouteEntry>,
}

/// One mounted handler
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub method: HttpMethod,
    pub path: String,
    pub handler: HandlerDescriptor,
    /// HTTP status codes of the declared errors, ascending
    pub error_statuses: Vec<u16>,
}

impl RouteEntry {
    pub fn new(method: HttpMethod, path: impl Into<String>, handler: HandlerDescriptor) -> Self {
        let mut error_statuses: Vec<u16> = handler
            .expected_errors()
            .map(|status| status.http_status().as_u16())
            .collect();
        error_statuses.sort_unstable();
        error_statuses.dedup();

        Self {
            method,
            path: path.into(),
            handler,
            error_statuses,
        }
    }
}

impl ApiCatalog {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            routes: Vec::new(),
        }
    }

    pub fn route(&self, method: HttpMethod, path: &str) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .find(|entry| entry.method == method && entry.path == path)
    }

    pub fn to_json(&self) -> Result<String, RouteHausError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the catalog, replacing any existing file
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RouteHausError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("API catalog written to {}", path.display());
        Ok(())
    }
}
