use serde::Deserialize;

/// One model as advertised by `models.list`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Resource name, e.g. `models/gemini-1.5-flash`.
    pub name: String,
    pub display_name: Option<String>,
    pub supported_generation_methods: Vec<String>,
}

impl ModelDescriptor {
    pub fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods.iter().any(|m| m == method)
    }
}

impl From<&str> for ModelDescriptor {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl std::fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ListModelsResponse {
    pub(super) models: Vec<ModelDescriptor>,
    pub(super) next_page_token: Option<String>,
}

/// `gemini-pro` and `models/gemini-pro` both become `models/gemini-pro`.
pub(super) fn resource_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_list_page() {
        let json = r#"
            {
              "models": [
                {
                  "name": "models/gemini-1.5-flash",
                  "version": "001",
                  "displayName": "Gemini 1.5 Flash",
                  "inputTokenLimit": 1000000,
                  "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                { "name": "models/embedding-001" }
              ],
              "nextPageToken": "abc"
            }
        "#;
        let page: ListModelsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.models.len(), 2);
        assert_eq!(page.models[0].display_name.as_deref(), Some("Gemini 1.5 Flash"));
        assert!(page.models[0].supports("generateContent"));
        assert!(!page.models[1].supports("generateContent"));
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn serde_empty_page() {
        let page: ListModelsResponse = serde_json::from_str("{}").unwrap();
        assert!(page.models.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn qualifies_names() {
        assert_eq!(resource_name("gemini-pro"), "models/gemini-pro");
        assert_eq!(resource_name("models/gemini-pro"), "models/gemini-pro");
        assert_eq!(resource_name("tunedModels/mine"), "tunedModels/mine");
    }
}
