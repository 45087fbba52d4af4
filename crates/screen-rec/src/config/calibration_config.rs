use crate::config::{default_cell_height, default_cell_width, default_origin_command};

use screen_rec_core::{Calibration, Origin, ScreenBounds};

use serde::{Deserialize, Serialize};

/// Cell-to-pixel calibration overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Cell width in pixels.
    #[serde(default = "default_cell_width")]
    pub cell_width: u32,
    /// Cell height in pixels.
    #[serde(default = "default_cell_height")]
    pub cell_height: u32,
    /// Host window origin used when the origin command gives no answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    /// Command printing a `Position: X,Y` line. Empty disables the query.
    #[serde(default = "default_origin_command")]
    pub origin_command: Vec<String>,
    /// Screen size for clamping capture rectangles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenBounds>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            origin: None,
            origin_command: default_origin_command(),
            screen: None,
        }
    }
}

impl CalibrationConfig {
    /// Calibration handed to the geometry resolver.
    pub fn to_calibration(&self) -> Calibration {
        Calibration {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            origin_override: self.origin,
            screen: self.screen,
        }
    }

    /// Take over values from a calibration, keeping the origin command.
    pub fn apply(&mut self, calibration: &Calibration) {
        self.cell_width = calibration.cell_width;
        self.cell_height = calibration.cell_height;
        self.origin = calibration.origin_override;
        self.screen = calibration.screen;
    }
}
