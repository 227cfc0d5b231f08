use std::sync::Arc;

use env_logger::Env;
use log::info;
use rosc::OscType;

use facebridge::core::codec::Message;
use facebridge::core::config::BridgeConfig;
use facebridge::core::tracking::UnifiedTracking;
use facebridge::core::TrackingOsc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = BridgeConfig::load();
    let state = UnifiedTracking::handle(config.gaze_range.clone());

    let cal_state = state.clone();
    let osc = Arc::new(TrackingOsc::spawn(
        &config,
        Box::new(move |_avatar| {
            // new avatar usually means new wearer assumptions
            if let Ok(mut state) = cal_state.lock() {
                state.reset_calibration();
            }
        }),
    )?);

    // Stream gaze angles back out whenever a frame has been fully normalized.
    // The capture SDK feeds update_eye_frame/update_lip_frame from its own
    // callbacks; everything downstream hangs off this listener.
    let sender = osc.clone();
    state
        .lock()
        .expect("tracking state poisoned")
        .add_listener(Box::new(move |eye, _lip| {
            let [left_pitch, left_yaw, right_pitch, right_yaw] = eye.left_right_pitch_yaw();
            let msg = Message::new(
                "/tracking/eye/LeftRightPitchYaw",
                vec![
                    OscType::Float(left_pitch),
                    OscType::Float(left_yaw),
                    OscType::Float(right_pitch),
                    OscType::Float(right_yaw),
                ],
            );
            sender.send(&msg).ok();
        }));

    info!("Listening for OSC messages on {}", osc.listen_addr());

    // Park on the receive loop; runs until the process is told to go away.
    loop {
        std::thread::park();
    }
}
