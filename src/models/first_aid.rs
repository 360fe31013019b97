use serde::{ Deserialize, Serialize };

/// Reference first-aid content, written out of band and served read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstAidEntry {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub image_url: String,
}
