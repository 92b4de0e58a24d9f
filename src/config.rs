use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the appointment-availability API
    pub api_url: String,

    /// Geographic search filters
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default = "default_radius_km")]
    pub radius_km: u32,
    pub address: String,

    /// Reservation reason code understood by the upstream API
    pub reason: String,

    /// Number of documents the appointment is for
    pub documents_number: u32,

    /// Last acceptable appointment date, `YYYY-MM-DD`
    pub end_date: String,

    /// Audio file played when slots are found
    pub sound_file_path: PathBuf,

    /// System command used to play it (one argument: the file path)
    #[serde(default = "default_sound_command")]
    pub sound_command: String,

    /// Log file, truncated at startup
    pub log_file_path: PathBuf,

    /// Seconds to wait between polls
    #[serde(default = "default_sleep_time")]
    pub sleep_time_sec: u64,
}

fn default_radius_km() -> u32 {
    20
}

fn default_sleep_time() -> u64 {
    60
}

fn default_sound_command() -> String {
    if cfg!(target_os = "macos") {
        "afplay".to_string()
    } else {
        "aplay".to_string()
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;

        anyhow::ensure!(
            settings.sleep_time_sec > 0,
            "sleep_time_sec must be a positive number of seconds"
        );

        Ok(settings)
    }

    pub fn example() -> Self {
        Settings {
            api_url: "https://api.example.org/api/slots".to_string(),
            longitude: 4.83,
            latitude: 45.76,
            radius_km: 20,
            address: "Lyon".to_string(),
            reason: "CNI".to_string(),
            documents_number: 1,
            end_date: "2025-12-31".to_string(),
            sound_file_path: PathBuf::from("./alert.wav"),
            sound_command: default_sound_command(),
            log_file_path: PathBuf::from("./slot-watcher.log"),
            sleep_time_sec: 60,
        }
    }

    /// Read-only view of the fields that go out on the wire.
    pub fn query_parameters(&self) -> QueryParameters {
        QueryParameters {
            api_url: self.api_url.clone(),
            longitude: self.longitude,
            latitude: self.latitude,
            radius_km: self.radius_km,
            address: self.address.clone(),
            reason: self.reason.clone(),
            documents_number: self.documents_number,
            end_date: self.end_date.clone(),
        }
    }
}

/// Connection and query settings for one availability request.
///
/// `start_date` is deliberately absent: it is recomputed at every fetch
/// rather than fixed at configuration time.
#[derive(Debug, Clone)]
pub struct QueryParameters {
    pub api_url: String,
    pub longitude: f64,
    pub latitude: f64,
    pub radius_km: u32,
    pub address: String,
    pub reason: String,
    pub documents_number: u32,
    pub end_date: String,
}

impl QueryParameters {
    /// Query-string pairs for one request, with the freshly computed
    /// start date appended.
    pub fn query_pairs(&self, start_date: &str) -> Vec<(&'static str, String)> {
        vec![
            ("longitude", self.longitude.to_string()),
            ("latitude", self.latitude.to_string()),
            ("end_date", self.end_date.clone()),
            ("radius_km", self.radius_km.to_string()),
            ("address", self.address.clone()),
            ("reason", self.reason.clone()),
            ("documents_number", self.documents_number.to_string()),
            ("start_date", start_date.to_string()),
        ]
    }
}
