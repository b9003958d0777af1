//! Response mapping
//!
//! Turns decoded response envelopes into domain values. This is the only
//! place that applies the "status must be success" rule.

use crate::config::gateway::STATUS_SUCCESS;
use crate::data::types::BreedListEntry;
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Envelope shared by every endpoint: `{ "message": ..., "status": ... }`
///
/// `message` stays untyped until the status is known, because failed
/// responses carry a plain string there.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: serde_json::Value,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Map a `/breeds/list/all` envelope into breed entries
pub fn map_breeds(envelope: ApiEnvelope) -> Result<Vec<BreedListEntry>> {
    if !envelope.is_success() {
        debug!(status = %envelope.status, "breed list rejected");
        return Ok(Vec::new());
    }
    let taxonomy: HashMap<String, Vec<String>> = serde_json::from_value(envelope.message)
        .map_err(|e| AppError::Decode(format!("breed list: {e}")))?;
    Ok(taxonomy
        .into_iter()
        .map(|(name, subtypes)| BreedListEntry::new(name, subtypes))
        .collect())
}

/// Map a `/breed/{name}/images` envelope into image URLs
pub fn map_images(envelope: ApiEnvelope) -> Result<Vec<String>> {
    if !envelope.is_success() {
        debug!(status = %envelope.status, "image list rejected");
        return Ok(Vec::new());
    }
    serde_json::from_value(envelope.message)
        .map_err(|e| AppError::Decode(format!("image list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> ApiEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_map_breeds_success() {
        let mut breeds = map_breeds(envelope(
            r#"{"message":{"bulldog":[],"akita":["japanese"]},"status":"success"}"#,
        ))
        .unwrap();
        breeds.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(breeds.len(), 2);
        assert_eq!(breeds[0].name, "akita");
        assert_eq!(breeds[0].subtypes, vec!["japanese".to_string()]);
        assert_eq!(breeds[1].name, "bulldog");
        assert!(breeds[1].subtypes.is_empty());
    }

    #[test]
    fn test_map_breeds_non_success_is_empty() {
        let breeds = map_breeds(envelope(
            r#"{"message":{"akita":[]},"status":"error"}"#,
        ))
        .unwrap();
        assert!(breeds.is_empty());
    }

    #[test]
    fn test_map_breeds_wrong_shape_is_error() {
        let result = map_breeds(envelope(r#"{"message":["akita"],"status":"success"}"#));
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn test_map_images_success() {
        let images = map_images(envelope(
            r#"{"message":["https://images.dog.ceo/b/2.jpg","https://images.dog.ceo/b/1.jpg"],"status":"success"}"#,
        ))
        .unwrap();
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_map_images_error_status_is_empty() {
        // Failed lookups carry a string message instead of a list
        let images = map_images(envelope(
            r#"{"status":"error","message":"Breed not found (main breed does not exist)","code":404}"#,
        ))
        .unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_envelope_without_message() {
        let env = envelope(r#"{"status":"error"}"#);
        assert!(!env.is_success());
        assert!(map_images(env).unwrap().is_empty());
    }
}
