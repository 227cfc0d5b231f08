use std::sync::{Arc, Mutex};

pub mod raw;
pub mod unified;

use self::raw::{RawEyeFrame, RawLipFrame};
use self::unified::{EyeTrackingData, GazeRange, LipTrackingData};

pub type FrameListener = Box<dyn FnMut(&EyeTrackingData, &LipTrackingData) + Send>;

/// Handle to the process-wide snapshot; hand a clone to everything that
/// reads or writes tracking state.
pub type TrackingHandle = Arc<Mutex<UnifiedTracking>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Latest fully-normalized eye and lip state, plus the listeners interested
/// in it. Listeners fire synchronously, in registration order, only once both
/// halves of a frame have been written; they must not retain the references.
pub struct UnifiedTracking {
    pub eye: EyeTrackingData,
    pub lip: LipTrackingData,
    listeners: Vec<(ListenerId, FrameListener)>,
    next_listener: u64,
    eye_fresh: bool,
    lip_fresh: bool,
}

impl UnifiedTracking {
    pub fn new(gaze_range: GazeRange) -> Self {
        Self {
            eye: EyeTrackingData::new(gaze_range),
            lip: LipTrackingData::default(),
            listeners: Vec::new(),
            next_listener: 0,
            eye_fresh: false,
            lip_fresh: false,
        }
    }

    pub fn handle(gaze_range: GazeRange) -> TrackingHandle {
        Arc::new(Mutex::new(Self::new(gaze_range)))
    }

    pub fn add_listener(&mut self, listener: FrameListener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Pushed by the tracking source on every new eye sample.
    pub fn update_eye_frame(&mut self, frame: &RawEyeFrame) {
        self.eye.update(frame);
        self.eye_fresh = true;
        self.maybe_notify();
    }

    /// Pushed by the tracking source on every new lip sample.
    pub fn update_lip_frame(&mut self, frame: &RawLipFrame) {
        self.lip.update(frame);
        self.lip_fresh = true;
        self.maybe_notify();
    }

    /// Restarts dilation calibration, e.g. for a new wearer or avatar.
    pub fn reset_calibration(&mut self) {
        self.eye.reset_thresholds();
    }

    fn maybe_notify(&mut self) {
        if !(self.eye_fresh && self.lip_fresh) {
            return;
        }
        self.eye_fresh = false;
        self.lip_fresh = false;

        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.eye, &self.lip);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::raw::{RawEyeSample, NUM_LIP_SHAPES};
    use super::*;
    use glam::Vec2;

    fn eye_frame() -> RawEyeFrame {
        RawEyeFrame {
            left: RawEyeSample {
                gaze: Vec2::new(0.5, 0.0),
                gaze_valid: true,
                openness: 1.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn notifies_only_after_both_halves() {
        let state = UnifiedTracking::handle(GazeRange::default());
        let (tx, rx) = channel();

        state.lock().unwrap().add_listener(Box::new(move |eye, lip| {
            tx.send((eye.left.look, lip.shapes[0])).unwrap();
        }));

        let mut guard = state.lock().unwrap();
        guard.update_eye_frame(&eye_frame());
        assert!(rx.try_recv().is_err(), "eye alone must not notify");

        let mut lip = RawLipFrame::default();
        lip.weights[0] = 0.5;
        guard.update_lip_frame(&lip);

        let (look, jaw) = rx.try_recv().unwrap();
        assert_eq!(look, Vec2::new(-0.5, 0.0));
        assert_eq!(jaw, 0.5);

        // flags were cleared: the next eye-only update stays silent
        guard.update_eye_frame(&eye_frame());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let mut state = UnifiedTracking::new(GazeRange::default());
        let (tx, rx) = channel();

        for tag in 0..3 {
            let tx = tx.clone();
            state.add_listener(Box::new(move |_, _| tx.send(tag).unwrap()));
        }

        state.update_eye_frame(&eye_frame());
        state.update_lip_frame(&RawLipFrame::default());

        assert_eq!(
            (rx.try_recv(), rx.try_recv(), rx.try_recv()),
            (Ok(0), Ok(1), Ok(2))
        );
    }

    #[test]
    fn removed_listener_stays_silent() {
        let mut state = UnifiedTracking::new(GazeRange::default());
        let (tx, rx) = channel();

        let tx2 = tx.clone();
        let first = state.add_listener(Box::new(move |_, _| tx2.send("first").unwrap()));
        state.add_listener(Box::new(move |_, _| tx.send("second").unwrap()));
        state.remove_listener(first);

        state.update_eye_frame(&eye_frame());
        state.update_lip_frame(&RawLipFrame::default());

        assert_eq!(rx.try_recv(), Ok("second"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn lip_store_copies_full_vocabulary() {
        let mut state = UnifiedTracking::new(GazeRange::default());

        let mut frame = RawLipFrame::default();
        for (i, w) in frame.weights.iter_mut().enumerate() {
            *w = i as f32 / NUM_LIP_SHAPES as f32;
        }
        state.update_lip_frame(&frame);

        assert_eq!(state.lip.shapes, frame.weights);
    }

    #[test]
    fn reset_calibration_goes_through_the_handle() {
        let state = UnifiedTracking::handle(GazeRange::default());

        let mut frame = RawEyeFrame::default();
        frame.right.pupil_diameter_mm = 4.0;
        frame.right.pupil_valid = true;

        let mut guard = state.lock().unwrap();
        guard.update_eye_frame(&frame);
        frame.right.pupil_diameter_mm = 6.0;
        guard.update_eye_frame(&frame);
        let before = guard.eye.dilation;
        assert!(before.is_finite());

        guard.reset_calibration();
        // bounds are back at the sentinels; next reading re-degenerates
        guard.update_eye_frame(&frame);
        assert!(!guard.eye.dilation.is_finite() || guard.eye.dilation.abs() > 1e3);
    }
}
