//! DTOs for API requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cymru_core::types::CacheEntry;

/// Body of `POST /api/geocode`.
///
/// If `organizationNames` is present the request is a batch; otherwise
/// `organizationName` is resolved on its own.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeRequest {
    /// Single organisation name
    #[serde(default)]
    pub organization_name: Option<String>,
    /// Batch of organisation names
    #[serde(default)]
    pub organization_names: Option<Vec<String>>,
}

impl GeocodeRequest {
    /// Returns true for the batch shape.
    pub fn is_batch(&self) -> bool {
        self.organization_names.is_some()
    }

    /// Returns the names to resolve, in request order.
    pub fn names(&self) -> Vec<String> {
        match (&self.organization_names, &self.organization_name) {
            (Some(names), _) => names.clone(),
            (None, Some(name)) if !name.is_empty() => vec![name.clone()],
            _ => Vec::new(),
        }
    }
}

/// Response for the batch shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchGeocodeResponse {
    /// Name → `{lat, lng}` or `null`
    pub results: BTreeMap<String, CacheEntry>,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shape() {
        let req: GeocodeRequest =
            serde_json::from_str(r#"{"organizationName": "Cardiff RFC"}"#).unwrap();
        assert!(!req.is_batch());
        assert_eq!(req.names(), vec!["Cardiff RFC".to_string()]);
    }

    #[test]
    fn test_batch_shape_wins() {
        let req: GeocodeRequest = serde_json::from_str(
            r#"{"organizationName": "Ignored", "organizationNames": ["Neath RFC", "Swansea RFC"]}"#,
        )
        .unwrap();
        assert!(req.is_batch());
        assert_eq!(req.names(), vec!["Neath RFC".to_string(), "Swansea RFC".to_string()]);
    }

    #[test]
    fn test_empty_single_name_yields_nothing() {
        let req: GeocodeRequest = serde_json::from_str(r#"{"organizationName": ""}"#).unwrap();
        assert!(req.names().is_empty());

        let req: GeocodeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.names().is_empty());
    }
}
