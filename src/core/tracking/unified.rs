use glam::Vec2;
use serde::Deserialize;

use super::raw::{
    CameraFrame, LipShape, RawEyeExpression, RawEyeFrame, RawEyeSample, RawLipFrame,
    NUM_LIP_SHAPES,
};

const DILATION_MIN_SENTINEL: f32 = 999.0;

/// A single eye; also used for the synthesized combined eye.
#[derive(Debug, Default, Clone, Copy)]
pub struct Eye {
    pub look: Vec2,
    pub openness: f32,
    pub widen: f32,
    pub squeeze: f32,
}

impl Eye {
    pub fn update(&mut self, sample: &RawEyeSample, expression: Option<&RawEyeExpression>) {
        // invalid gaze keeps the last known direction instead of snapping to zero
        if sample.gaze_valid {
            self.look = -sample.gaze;
        }

        self.openness = sample.openness;

        // None for the combined eye; its widen/squeeze are derived from left/right
        let Some(expression) = expression else {
            return;
        };
        self.widen = expression.wide;
        self.squeeze = expression.squeeze;
    }
}

/// Angular bounds the normalized look vector is mapped into.
/// The inner/outer convention: -1 is outward, +1 is inward for the left eye,
/// mirrored for the right.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GazeRange {
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub yaw_outer: f32,
    pub yaw_inner: f32,
}

impl Default for GazeRange {
    fn default() -> Self {
        Self {
            min_pitch: 60.0,
            max_pitch: -60.0,
            yaw_outer: -100.0,
            yaw_inner: 100.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EyeTrackingData {
    pub left: Eye,
    pub right: Eye,
    pub combined: Eye,
    /// Pupil dilation relative to the observed bounds; unclamped, and
    /// degenerate until the bounds have widened past a single reading.
    pub dilation: f32,
    max_dilation: f32,
    min_dilation: f32,
    pub gaze_range: GazeRange,
}

impl EyeTrackingData {
    pub fn new(gaze_range: GazeRange) -> Self {
        Self {
            left: Eye::default(),
            right: Eye::default(),
            combined: Eye::default(),
            dilation: 0.0,
            max_dilation: 0.0,
            min_dilation: DILATION_MIN_SENTINEL,
            gaze_range,
        }
    }

    pub fn update(&mut self, frame: &RawEyeFrame) {
        let mut dilation = 0.0;

        if frame.right.pupil_valid {
            dilation = frame.right.pupil_diameter_mm;
            self.widen_dilation_bounds(dilation);
        } else if frame.left.pupil_valid {
            dilation = frame.left.pupil_diameter_mm;
            self.widen_dilation_bounds(dilation);
        }

        self.left.update(&frame.left, Some(&frame.left_expression));
        self.right.update(&frame.right, Some(&frame.right_expression));

        // hardware reports no combined widen/squeeze; fabricate them
        self.combined.update(&frame.combined, None);
        self.combined.widen = (self.left.widen + self.right.widen) / 2.0;
        self.combined.squeeze = (self.left.squeeze + self.right.squeeze) / 2.0;

        if dilation != 0.0 {
            // direct ratio, not (d - min) / (max - min); downstream consumers
            // depend on this exact shape and tolerate out-of-range values
            self.dilation = dilation / self.min_dilation / (self.max_dilation - self.min_dilation);
        }
    }

    fn widen_dilation_bounds(&mut self, read: f32) {
        if read > self.max_dilation {
            self.max_dilation = read;
        }
        if read < self.min_dilation {
            self.min_dilation = read;
        }
    }

    /// Discards calibration history; call when the wearer or avatar changes.
    pub fn reset_thresholds(&mut self) {
        self.max_dilation = 0.0;
        self.min_dilation = DILATION_MIN_SENTINEL;
    }

    /// (In degrees) left pitch, left yaw, right pitch, right yaw.
    /// Example data: -14.903, 23.592, -15.560, 16.503
    pub fn left_right_pitch_yaw(&self) -> [f32; 4] {
        let range = &self.gaze_range;
        [
            lerp((self.left.look.y + 1.0) * 0.5, range.min_pitch, range.max_pitch),
            // -1 is left (outer), 1 is right (inner)
            lerp((self.left.look.x + 1.0) * 0.5, range.yaw_outer, range.yaw_inner),
            lerp((self.right.look.y + 1.0) * 0.5, range.min_pitch, range.max_pitch),
            // swapped and negated so -1 is inner and 1 is outer for the right eye
            lerp(
                (self.right.look.x + 1.0) * 0.5,
                -range.yaw_inner,
                -range.yaw_outer,
            ),
        ]
    }
}

fn lerp(t: f32, min: f32, max: f32) -> f32 {
    min + (max - min) * t
}

#[derive(Debug, Clone)]
pub struct LipTrackingData {
    pub shapes: [f32; NUM_LIP_SHAPES],
    pub image: Option<CameraFrame>,
}

impl Default for LipTrackingData {
    fn default() -> Self {
        Self {
            shapes: [0.0; NUM_LIP_SHAPES],
            image: None,
        }
    }
}

impl LipTrackingData {
    pub fn update(&mut self, frame: &RawLipFrame) {
        self.shapes = frame.weights;
        self.image = frame.image.clone();
    }

    #[inline(always)]
    pub fn shape(&self, shape: LipShape) -> f32 {
        self.shapes[shape as usize]
    }
}
