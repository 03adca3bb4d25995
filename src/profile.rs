use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider-agnostic identity built from a token exchange response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    /// Name of the provider that issued the identity
    pub provider: String,
    /// Raw user identifier, exactly as the provider sent it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Profile {
    pub fn new<T: Into<String>>(provider: T) -> Self {
        Profile {
            provider: provider.into(),
            id: None,
        }
    }

    pub fn id(self, id: Option<Value>) -> Self {
        Profile { id, ..self }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_omits_missing_id() {
        let profile = Profile::new("withings");
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({ "provider": "withings" })
        );

        let profile = profile.id(Some(json!(12345)));
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({ "provider": "withings", "id": 12345 })
        );
    }
}
