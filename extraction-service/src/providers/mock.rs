use async_trait::async_trait;

use crate::config::{ExtractionConfig, ModelProvider};
use crate::error::ExtractionResult;
use crate::providers::ModelProviderTrait;

/// A schema-conformant green-code record, so an offline stack produces a
/// working end-to-end flow out of the box.
const DEFAULT_RESPONSE: &str = r#"{
  "reporterSource": "patient",
  "callInfo": {
    "callDate": "2024-06-15",
    "callTime": "14:32",
    "location": "Via Garibaldi 12, Bologna",
    "reportedCondition": "fall from bicycle",
    "exitCode": { "green": true }
  },
  "patient": { "firstName": "Anna", "lastName": "Bianchi", "sex": "F", "age": 34 },
  "vitals": {
    "consciousness": { "alert": true },
    "skin": { "normal": true },
    "breathing": { "normal": true },
    "bloodPressure": "125/80",
    "pulse": 88,
    "oxygenSaturation": 98
  }
}"#;

/// Returns a fixed response, for tests and offline development.
pub struct MockModelProvider {
    response: String,
}

impl MockModelProvider {
    pub fn new(config: &ExtractionConfig) -> Self {
        let response = match &config.provider {
            ModelProvider::Mock {
                response: Some(text),
            } => text.clone(),
            _ => DEFAULT_RESPONSE.to_string(),
        };
        Self { response }
    }
}

#[async_trait]
impl ModelProviderTrait for MockModelProvider {
    async fn complete(&self, _prompt: &str) -> ExtractionResult<String> {
        Ok(self.response.clone())
    }
}
