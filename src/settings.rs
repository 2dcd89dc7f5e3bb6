//! Track settings
//!
//! Fixed at construction; the engine never mutates them at runtime.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::beads::TrackRange;
use crate::consts::*;
use crate::error::SettingsError;

/// Geometry and pool size of the bead track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Minimum spacing between adjacent active beads
    pub slot_width: f32,
    /// Leftmost legal bead position
    pub min_x: f32,
    /// Rightmost legal bead position
    pub max_x: f32,
    /// Distance from the divider to the innermost RIGHT bead
    pub divider_buffer: f32,
    /// divider(left) = left / divider_scale + divider_offset
    pub divider_scale: f32,
    pub divider_offset: f32,
    /// Beads per cluster in the organized layout
    pub cluster_size: usize,
    /// Number of beads in the pool (largest supported total)
    pub pool_size: usize,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            slot_width: SLOT_WIDTH,
            min_x: TRACK_MIN_X,
            max_x: TRACK_MAX_X,
            divider_buffer: DIVIDER_BUFFER,
            divider_scale: DIVIDER_SCALE,
            divider_offset: DIVIDER_OFFSET,
            cluster_size: CLUSTER_SIZE,
            pool_size: POOL_SIZE,
        }
    }
}

impl TrackSettings {
    /// Derive track bounds from a physical wire width and bead width.
    ///
    /// The track becomes a lattice of `track_width / bead_width` slots of
    /// width 1, starting at 0.
    pub fn from_physical(track_width: f32, bead_width: f32) -> Self {
        Self {
            slot_width: 1.0,
            min_x: 0.0,
            max_x: (track_width / bead_width).floor(),
            ..Self::default()
        }
    }

    /// Divider coordinate for a given LEFT count
    pub fn divider_position(&self, left_count: usize) -> f32 {
        left_count as f32 / self.divider_scale + self.divider_offset
    }

    pub fn range(&self) -> TrackRange {
        TrackRange::new(self.min_x, self.max_x)
    }

    /// Extra slots a group of `count` beads needs when laid out in clusters
    pub fn cluster_gaps(&self, count: usize) -> usize {
        if count == 0 {
            0
        } else {
            (count - 1) / self.cluster_size
        }
    }

    /// Check that every split of every total up to `pool_size` fits the track
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.slot_width.is_nan() || self.slot_width <= 0.0 {
            return Err(SettingsError::invalid("slot_width", "must be positive"));
        }
        if self.max_x.is_nan() || self.min_x.is_nan() || self.max_x <= self.min_x {
            return Err(SettingsError::invalid("max_x", "must exceed min_x"));
        }
        if self.divider_scale.is_nan() || self.divider_scale <= 0.0 {
            return Err(SettingsError::invalid("divider_scale", "must be positive"));
        }
        let half = self.slot_width / 2.0;
        if self.divider_buffer < half - POSITION_EPSILON
            || self.divider_buffer > 3.0 * half + POSITION_EPSILON
        {
            return Err(SettingsError::invalid(
                "divider_buffer",
                format!(
                    "{} must lie within [{}, {}]",
                    self.divider_buffer,
                    half,
                    3.0 * half
                ),
            ));
        }
        if self.cluster_size == 0 {
            return Err(SettingsError::invalid("cluster_size", "must be at least 1"));
        }
        if self.pool_size == 0 {
            return Err(SettingsError::invalid("pool_size", "must be at least 1"));
        }

        // Organized layout is the widest one, and the divider moves with the
        // LEFT count, so every count has to fit on both sides.
        for count in 0..=self.pool_size {
            let span =
                (count.saturating_sub(1) + self.cluster_gaps(count)) as f32 * self.slot_width;

            let left_inner =
                self.divider_position(count) + self.divider_buffer - 2.0 * self.slot_width;
            if count > 0 && left_inner - span < self.min_x - POSITION_EPSILON {
                return Err(SettingsError::TrackTooShort {
                    min_x: self.min_x,
                    max_x: self.max_x,
                    needed: self.min_x - (left_inner - span),
                });
            }

            // Fewer beads on the left leaves the divider further left, so the
            // widest RIGHT group sits behind the largest remaining LEFT count.
            let right_inner = self.divider_position(self.pool_size - count) + self.divider_buffer;
            if count > 0 && right_inner + span > self.max_x + POSITION_EPSILON {
                return Err(SettingsError::TrackTooShort {
                    min_x: self.min_x,
                    max_x: self.max_x,
                    needed: right_inner + span - self.max_x,
                });
            }
        }

        Ok(())
    }

    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded track settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default track settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Track settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(TrackSettings::default().validate().is_ok());
    }

    #[test]
    fn test_divider_position_matches_formula() {
        let settings = TrackSettings::default();
        assert!((settings.divider_position(0) - 15.0).abs() < 0.0001);
        assert!((settings.divider_position(3) - (3.0 / 2.2 + 15.0)).abs() < 0.0001);
    }

    #[test]
    fn test_cluster_gaps() {
        let settings = TrackSettings::default();
        assert_eq!(settings.cluster_gaps(0), 0);
        assert_eq!(settings.cluster_gaps(5), 0);
        assert_eq!(settings.cluster_gaps(6), 1);
        assert_eq!(settings.cluster_gaps(20), 3);
    }

    #[test]
    fn test_rejects_short_track() {
        let settings = TrackSettings {
            max_x: 30.0,
            ..TrackSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::TrackTooShort { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_buffer() {
        let settings = TrackSettings {
            divider_buffer: 3.0,
            ..TrackSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "divider_buffer", .. })
        ));
    }

    #[test]
    fn test_from_physical() {
        let settings = TrackSettings::from_physical(1200.0, 30.0);
        assert_eq!(settings.max_x, 40.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let path = std::env::temp_dir()
            .join(format!("bead_line_settings_{}.json", std::process::id()));
        let settings = TrackSettings {
            cluster_size: 4,
            ..TrackSettings::default()
        };
        settings.save(&path).unwrap();
        let loaded = TrackSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: TrackSettings = serde_json::from_str(r#"{"pool_size": 10}"#).unwrap();
        assert_eq!(settings.pool_size, 10);
        assert_eq!(settings.cluster_size, CLUSTER_SIZE);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let settings = TrackSettings::load_or_default("/nonexistent/bead_line.json");
        assert_eq!(settings, TrackSettings::default());
    }
}
