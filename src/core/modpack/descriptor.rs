use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::paths::{LogicalPath, PathResolver};
use crate::core::profiles::ProfileRecord;

/// `installer/profile.json` as shipped in a modpack.
#[derive(Debug, Deserialize)]
struct ProfileDescriptor {
    #[serde(default)]
    profiles: Map<String, Value>,
}

/// The `profiles.profile` entry. `gameDir` is a bare directory name.
#[derive(Debug, Deserialize)]
struct DescriptorProfile {
    name: String,
    #[serde(rename = "gameDir")]
    game_dir: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Turns a modpack profile descriptor into a launcher [`ProfileRecord`]
/// whose `gameDir` lives under the platform's game-content root.
#[derive(Debug, Clone)]
pub struct ProfileTransformer {
    game_root: PathBuf,
}

impl ProfileTransformer {
    pub fn new(paths: &PathResolver) -> Self {
        Self::with_game_root(paths.resolve(&LogicalPath::GameRoot))
    }

    pub fn with_game_root(game_root: impl Into<PathBuf>) -> Self {
        Self {
            game_root: game_root.into(),
        }
    }

    pub fn transform(&self, raw_descriptor: &str) -> InstallerResult<ProfileRecord> {
        let mut descriptor: ProfileDescriptor = serde_json::from_str(raw_descriptor)
            .map_err(|e| InstallerError::MalformedDescriptor(e.to_string()))?;

        let entry = descriptor.profiles.remove("profile").ok_or_else(|| {
            InstallerError::MalformedDescriptor("missing profiles.profile entry".into())
        })?;
        let profile: DescriptorProfile = serde_json::from_value(entry)
            .map_err(|e| InstallerError::MalformedDescriptor(e.to_string()))?;

        let dir_name = checked_dir_name(&profile.game_dir)?;

        Ok(ProfileRecord {
            name: profile.name,
            game_dir: self.game_root.join(dir_name),
            extra: profile.extra,
        })
    }

    pub async fn transform_file(&self, descriptor_path: &Path) -> InstallerResult<ProfileRecord> {
        let raw = tokio::fs::read_to_string(descriptor_path)
            .await
            .map_err(|e| {
                InstallerError::MalformedDescriptor(format!("{:?}: {}", descriptor_path, e))
            })?;
        self.transform(&raw)
    }
}

/// Accepts only relative paths made of plain components, so the joined
/// game directory always stays under the game root.
fn checked_dir_name(raw: &str) -> InstallerResult<PathBuf> {
    let path = Path::new(raw);
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => {
                return Err(InstallerError::MalformedDescriptor(format!(
                    "gameDir must be a directory name, got {raw:?}"
                )))
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(InstallerError::MalformedDescriptor("empty gameDir".into()));
    }
    Ok(clean)
}
