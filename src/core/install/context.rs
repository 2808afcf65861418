use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::game_dir::Placement;
use super::stage::Stage;
use crate::core::link::DownloadLink;
use crate::core::profiles::ProfileRecord;

/// State threaded through the stages of one install attempt. Never persisted.
#[derive(Debug, Clone)]
pub struct InstallAttempt {
    pub id: Uuid,
    pub stage: Stage,
    pub raw_link: String,
    pub link: Option<DownloadLink>,
    pub working_dir: PathBuf,
    /// Set once the descriptor has been transformed.
    pub profile: Option<ProfileRecord>,
    /// True when this attempt created the game directory and may remove it.
    pub owns_game_dir: bool,
    pub placement: Option<Placement>,
    pub registry_key: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl InstallAttempt {
    pub fn new(raw_link: &str, working_dir: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: Stage::Idle,
            raw_link: raw_link.to_string(),
            link: None,
            working_dir,
            profile: None,
            owns_game_dir: false,
            placement: None,
            registry_key: None,
            started_at: Utc::now(),
        }
    }

    /// Summary of a finished attempt, if it got far enough to have one.
    pub fn report(&self) -> Option<InstallReport> {
        let profile = self.profile.as_ref()?;
        Some(InstallReport {
            attempt_id: self.id,
            profile_name: profile.name.clone(),
            game_dir: profile.game_dir.clone(),
            registry_key: self.registry_key.clone()?,
            fresh_install: self.placement == Some(Placement::Fresh),
            started_at: self.started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub attempt_id: Uuid,
    pub profile_name: String,
    pub game_dir: PathBuf,
    pub registry_key: String,
    /// False when an existing game directory only had its mods refreshed.
    pub fresh_install: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
