use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An image submitted for ingredient detection
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A label returned by the vision provider with its confidence in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedConcept {
    pub name: String,
    pub confidence: f32,
}

/// Response body of the detection endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetectedIngredients {
    pub ingredients: Vec<String>,
}

// ============================================================================
// Clarifai API Types
// ============================================================================

/// Request body for POST /v2/models/{model_id}/outputs
#[derive(Debug, Serialize)]
pub struct ClarifaiRequest {
    pub inputs: Vec<ClarifaiInput>,
}

#[derive(Debug, Serialize)]
pub struct ClarifaiInput {
    pub data: ClarifaiInputData,
}

#[derive(Debug, Serialize)]
pub struct ClarifaiInputData {
    pub image: ClarifaiImage,
}

#[derive(Debug, Serialize)]
pub struct ClarifaiImage {
    pub base64: String,
}

impl ClarifaiRequest {
    /// Wraps one base64-encoded image
    pub fn single_image(base64: String) -> Self {
        Self {
            inputs: vec![ClarifaiInput {
                data: ClarifaiInputData {
                    image: ClarifaiImage { base64 },
                },
            }],
        }
    }
}

/// Reads any JSON value, keeping it only if it has the expected shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Raw API response; every level is optional because error bodies share it
///
/// Fields of an unexpected type decode as absent instead of failing the
/// whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClarifaiResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<ClarifaiStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub outputs: Option<Vec<ClarifaiOutput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClarifaiStatus {
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClarifaiOutput {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<ClarifaiOutputData>,
}

/// Concepts stay raw so one malformed entry does not discard the rest
#[derive(Debug, Clone, Deserialize)]
pub struct ClarifaiOutputData {
    #[serde(default, deserialize_with = "lenient")]
    pub concepts: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClarifaiConcept {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<f32>,
}

impl ClarifaiResponse {
    /// Concepts of the first output
    ///
    /// Entries without a string name and a numeric value are skipped.
    pub fn into_concepts(self) -> Vec<DetectedConcept> {
        self.outputs
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|output| output.data)
            .and_then(|data| data.concepts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| serde_json::from_value::<ClarifaiConcept>(raw).ok())
            .filter_map(|concept| match (concept.name, concept.value) {
                (Some(name), Some(confidence)) => Some(DetectedConcept { name, confidence }),
                _ => None,
            })
            .collect()
    }

    /// Error description reported by the API, if any
    pub fn error_description(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.description.as_deref())
    }
}
