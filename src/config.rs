// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// --- Defaults ---

fn default_symprec() -> f64 {
  1e-5
}

fn default_amplitude() -> f64 {
  0.01
}

fn default_max_displaced_files() -> usize {
  1000
}

fn default_amplitude_warning() -> f64 {
  0.1
}

fn default_symprec_warning() -> f64 {
  1e-3
}

// --- Main Config Struct ---

/// Tool defaults shared by all front-ends. Command-line flags win.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default = "default_symprec")]
  pub symprec: f64,

  /// Default maximum displacement, in lattice length units.
  #[serde(default = "default_amplitude")]
  pub amplitude: f64,

  #[serde(default = "default_max_displaced_files")]
  pub max_displaced_files: usize,

  // Thresholds above which a tool warns but carries on
  #[serde(default = "default_amplitude_warning")]
  pub amplitude_warning: f64,
  #[serde(default = "default_symprec_warning")]
  pub symprec_warning: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      symprec: default_symprec(),
      amplitude: default_amplitude(),
      max_displaced_files: default_max_displaced_files(),
      amplitude_warning: default_amplitude_warning(),
      symprec_warning: default_symprec_warning(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/poscar-tools/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  /// Missing file gives the defaults; so does a broken one, with a message
  /// saying why.
  pub fn load_from(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader(reader) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "poscar-tools", "poscar-tools") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
