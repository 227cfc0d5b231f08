use glam::Vec2;
use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// One eye as reported by the capture hardware. Validity bits gate which
/// fields carry a usable reading this frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawEyeSample {
    pub gaze: Vec2,
    pub gaze_valid: bool,
    pub openness: f32,
    pub pupil_diameter_mm: f32,
    pub pupil_valid: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RawEyeExpression {
    pub wide: f32,
    pub squeeze: f32,
}

/// Everything the eye tracker produces in one capture callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawEyeFrame {
    pub left: RawEyeSample,
    pub right: RawEyeSample,
    pub combined: RawEyeSample,
    pub left_expression: RawEyeExpression,
    pub right_expression: RawEyeExpression,
}

#[derive(Debug, Clone)]
pub struct RawLipFrame {
    pub weights: [f32; NUM_LIP_SHAPES],
    pub image: Option<CameraFrame>,
}

impl Default for RawLipFrame {
    fn default() -> Self {
        Self {
            weights: [0.0; NUM_LIP_SHAPES],
            image: None,
        }
    }
}

/// Raw camera frame some lip trackers expose alongside the weights.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub const NUM_LIP_SHAPES: usize = LipShape::COUNT;

/// The lip tracker's fixed blend-shape vocabulary; weight vectors are indexed
/// by this order.
#[allow(unused)]
#[repr(usize)]
#[derive(Debug, Clone, Copy, EnumIter, EnumCount, EnumString, IntoStaticStr)]
pub enum LipShape {
    JawRight,
    JawLeft,
    JawForward,
    JawOpen,
    MouthApeShape,
    MouthUpperRight,
    MouthUpperLeft,
    MouthLowerRight,
    MouthLowerLeft,
    MouthUpperOverturn,
    MouthLowerOverturn,
    MouthPout,
    MouthSmileRight,
    MouthSmileLeft,
    MouthSadRight,
    MouthSadLeft,
    CheekPuffRight,
    CheekPuffLeft,
    CheekSuck,
    MouthUpperUpRight,
    MouthUpperUpLeft,
    MouthLowerDownRight,
    MouthLowerDownLeft,
    MouthUpperInside,
    MouthLowerInside,
    MouthLowerOverlay,
    TongueLongStep1,
    TongueLeft,
    TongueRight,
    TongueUp,
    TongueDown,
    TongueRoll,
    TongueLongStep2,
    TongueUpRightMorph,
    TongueUpLeftMorph,
    TongueDownRightMorph,
    TongueDownLeftMorph,
}
