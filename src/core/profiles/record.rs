use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One launcher profile, as written into `launcher_profiles.json`.
///
/// Fields the installer does not interpret are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    #[serde(rename = "gameDir")]
    pub game_dir: PathBuf,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileRecord {
    /// Registry key for this profile: the lowercased name with its first
    /// space removed. Later spaces are kept (`"My Big Pack"` -> `"mybig pack"`),
    /// matching the keys earlier installs already wrote.
    pub fn registry_key(&self) -> String {
        self.name.to_lowercase().replacen(' ', "", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ProfileRecord {
        ProfileRecord {
            name: name.to_string(),
            game_dir: PathBuf::from("/games/mc/pack"),
            extra: Map::new(),
        }
    }

    #[test]
    fn key_drops_single_space() {
        assert_eq!(record("My Pack").registry_key(), "mypack");
    }

    #[test]
    fn key_keeps_second_space() {
        assert_eq!(record("My Big Pack").registry_key(), "mybig pack");
    }

    #[test]
    fn opaque_fields_survive_serialization() {
        let raw = r#"{"name":"Pack","gameDir":"/g/pack","lastVersionId":"1.20.1-forge","javaArgs":"-Xmx4G"}"#;
        let parsed: ProfileRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.extra["lastVersionId"], "1.20.1-forge");

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["gameDir"], "/g/pack");
        assert_eq!(value["javaArgs"], "-Xmx4G");
    }
}
