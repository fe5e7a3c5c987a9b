use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("element `{0}` not found")]
    MissingElement(String),
    #[error("scene object `{name}` not found (available: {})", .available.join(", "))]
    MissingSceneObject { name: String, available: Vec<String> },
    #[error("scene failed to load: {0}")]
    SceneLoad(String),
    #[error("invalid preview config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("dom operation failed: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for PreviewError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Dom(message)
    }
}
