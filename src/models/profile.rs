use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub phone: String,
}

/// Stored SOS profile, at most one per `user_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Body of `POST /api/sos`. Only `userId` is required.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubmission {
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub blood_group: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub medical_history: String,
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
}

impl ProfileSubmission {
    /// Trimmed `userId`, if one was supplied.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Builds the full record that replaces whatever was stored for this user.
    pub fn into_profile(self, user_id: String, created_at: i64, updated_at: i64) -> EmergencyProfile {
        EmergencyProfile {
            user_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            blood_group: self.blood_group,
            medical_history: self.medical_history,
            emergency_contacts: self.emergency_contacts.unwrap_or_default(),
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub user_id: Option<String>,
}
