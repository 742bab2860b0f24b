//! Configuration surface for the line pipeline.
//!
//! `DetectorConfig` is pass-through for the raw line detector (an external
//! collaborator this crate does not implement); `MergeConfig` fixes the
//! internal three-stage filter/merge driver schedule.

use crate::error::{LineError, Result};

/// Pass-through configuration for the raw line detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub length_threshold: f64,
    pub distance_threshold: f64,
    pub canny_th1: f64,
    pub canny_th2: f64,
    pub canny_aperture_size: u32,
    pub do_merge: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            length_threshold: 10.0,
            distance_threshold: 1.41421356,
            canny_th1: 50.0,
            canny_th2: 50.0,
            canny_aperture_size: 3,
            do_merge: true,
        }
    }
}

impl DetectorConfig {
    /// Checks that every field holds a value the detector can actually
    /// use, since this crate passes the struct straight through to an
    /// external collaborator without interpreting it.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::InvalidConfig`] describing the first field
    /// found out of range.
    pub fn validate(&self) -> Result<()> {
        if self.length_threshold < 0.0 {
            return Err(LineError::InvalidConfig(format!("length_threshold must be >= 0, got {}", self.length_threshold)));
        }
        if self.distance_threshold < 0.0 {
            return Err(LineError::InvalidConfig(format!("distance_threshold must be >= 0, got {}", self.distance_threshold)));
        }
        if self.canny_th1 < 0.0 || self.canny_th2 < 0.0 {
            return Err(LineError::InvalidConfig(format!(
                "canny thresholds must be >= 0, got ({}, {})",
                self.canny_th1, self.canny_th2
            )));
        }
        if self.canny_aperture_size % 2 == 0 || !(3..=7).contains(&self.canny_aperture_size) {
            return Err(LineError::InvalidConfig(format!(
                "canny_aperture_size must be an odd value in 3..=7, got {}",
                self.canny_aperture_size
            )));
        }
        Ok(())
    }
}

/// One `(angle_thr, distance_thr, endpoint_thr)` stage of the merge driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeStageConfig {
    pub angle_thr: f64,
    pub distance_thr: f64,
    pub endpoint_thr: f64,
}

/// Internal merge driver schedule: `filter > f0`, `merge(stage0)`,
/// `filter > f1`, `merge(stage1)`, `filter > f2`.
///
/// The constants are fixed (`(5, 30, 60)` length thresholds,
/// `((0.05, 5, 15), (0.03, 3, 50))` merge stages) and exposed only for
/// tests that need to exercise a single stage in isolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeConfig {
    pub filter_thresholds: [f64; 3],
    pub stages: [MergeStageConfig; 2],
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            filter_thresholds: [5.0, 30.0, 60.0],
            stages: [
                MergeStageConfig {
                    angle_thr: 0.05,
                    distance_thr: 5.0,
                    endpoint_thr: 15.0,
                },
                MergeStageConfig {
                    angle_thr: 0.03,
                    distance_thr: 3.0,
                    endpoint_thr: 50.0,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_detector_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_negative_length_threshold() {
        let config = DetectorConfig {
            length_threshold: -1.0,
            ..DetectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(LineError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_even_aperture_size() {
        let config = DetectorConfig {
            canny_aperture_size: 4,
            ..DetectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(LineError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_aperture_size_out_of_range() {
        let config = DetectorConfig {
            canny_aperture_size: 9,
            ..DetectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(LineError::InvalidConfig(_))));
    }
}
