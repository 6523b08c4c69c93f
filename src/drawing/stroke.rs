use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Thickest stroke a client may send
pub const MAX_STROKE_WIDTH: f64 = 100.0;

/// One freehand segment, relayed verbatim to every canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Stroke {
    pub fn new(start: (f64, f64), end: (f64, f64), width: f64) -> Self {
        Self {
            x1: start.0,
            y1: start.1,
            x2: end.0,
            y2: end.1,
            width,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(0.0..=MAX_STROKE_WIDTH).contains(&self.width) {
            return Err(GameError::InvalidStroke(format!(
                "Width out of range: {}",
                self.width
            )));
        }

        for coord in [self.x1, self.y1, self.x2, self.y2] {
            if !coord.is_finite() {
                return Err(GameError::InvalidStroke("Non-finite coordinate".into()));
            }
        }

        if let Some(color) = &self.color {
            if color.len() > 32 {
                return Err(GameError::InvalidStroke("Color too long".into()));
            }
        }

        Ok(())
    }
}

/// Eraser position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(())
        } else {
            Err(GameError::InvalidStroke("Non-finite erase point".into()))
        }
    }
}
