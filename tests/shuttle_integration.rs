//! End-to-end tests: crafted Vicon datagrams through decoder, tracker and
//! controller.
//!
//! The loopback tests bind `127.0.0.1:0` and need no capture system.

use std::net::UdpSocket;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use approx::assert_relative_eq;
use vicon_shuttle::{
    BodyPose, DecodeMode, Direction, FrameDecoder, FrameEncoder, MotionActuator, MotionCommand,
    RelativePose, Result, ShuttleController, TrackerState, UdpIngest, wait_for_home,
};

/// Records every command instead of moving anything.
#[derive(Default)]
struct RecordingActuator {
    commands: Vec<MotionCommand>,
}

impl MotionActuator for RecordingActuator {
    fn move_forward(&mut self) -> Result<()> {
        self.commands.push(MotionCommand::Forward);
        Ok(())
    }

    fn move_backward(&mut self) -> Result<()> {
        self.commands.push(MotionCommand::Backward);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.commands.push(MotionCommand::Stop);
        Ok(())
    }
}

fn rigid01(trans_x: f64) -> BodyPose {
    BodyPose::new("RIGID01", [trans_x, 0.0, 0.0], [0.0; 3])
}

fn assert_zero(pose: RelativePose) {
    assert_relative_eq!(pose.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pose.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pose.z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pose.roll, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pose.pitch, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pose.yaw, 0.0, epsilon = 1e-9);
}

#[test]
fn test_rigid01_scenario_in_memory() {
    let decoder = FrameDecoder::new(DecodeMode::Strict);
    let mut state = TrackerState::new("RIGID01");

    let first = decoder.decode(&FrameEncoder::single(1, &rigid01(1000.0))).unwrap();
    assert_eq!(first.pose.name, "RIGID01");
    state.apply(first.pose);
    assert_zero(state.relative().unwrap());
    assert_relative_eq!(state.tracker().home().unwrap().x, 100.0, epsilon = 1e-9);

    let second = decoder.decode(&FrameEncoder::single(2, &rigid01(1500.0))).unwrap();
    state.apply(second.pose);
    assert_relative_eq!(state.relative().unwrap().x, 50.0, epsilon = 1e-9);
}

#[test]
fn test_duplicate_frame_keeps_pose() {
    let decoder = FrameDecoder::default();
    let mut state = TrackerState::new("RIGID01");
    let datagram = FrameEncoder::single(5, &rigid01(1234.5));

    state.apply(decoder.decode(&datagram).unwrap().pose);
    let stored = state.store().get("RIGID01").cloned();
    state.apply(decoder.decode(&datagram).unwrap().pose);

    assert_eq!(state.store().object_count(), 2);
    assert_eq!(state.store().get("RIGID01").cloned(), stored);
}

#[test]
fn test_shuttle_over_loopback() {
    let mut ingest =
        UdpIngest::bind("127.0.0.1:0", Duration::from_millis(50), DecodeMode::Strict).unwrap();
    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    sender.connect(ingest.local_addr().unwrap()).unwrap();

    let mut state = TrackerState::new("RIGID01");
    let mut actuator = RecordingActuator::default();
    let mut controller = ShuttleController::new(0.5, Duration::from_millis(1));
    let running = AtomicBool::new(true);

    // Home
    sender.send(&FrameEncoder::single(1, &rigid01(1000.0))).unwrap();
    assert!(
        wait_for_home(
            &mut ingest,
            &mut state,
            Some(Duration::from_secs(2)),
            &running
        )
        .unwrap()
    );
    assert_zero(state.relative().unwrap());

    // +50 cm: past the limit, reverse to backward
    sender.send(&FrameEncoder::single(2, &rigid01(1500.0))).unwrap();
    let decision = controller
        .tick(&mut ingest, &mut state, &mut actuator)
        .unwrap();
    assert_eq!(decision, Some(Direction::Backward));
    assert_relative_eq!(state.relative().unwrap().x, 50.0, epsilon = 1e-9);

    // -10 cm: reverse to forward
    sender.send(&FrameEncoder::single(3, &rigid01(900.0))).unwrap();
    let decision = controller
        .tick(&mut ingest, &mut state, &mut actuator)
        .unwrap();
    assert_eq!(decision, Some(Direction::Forward));

    // Back inside the box: no command, direction kept
    sender.send(&FrameEncoder::single(4, &rigid01(1000.0))).unwrap();
    let decision = controller
        .tick(&mut ingest, &mut state, &mut actuator)
        .unwrap();
    assert_eq!(decision, None);
    assert_eq!(controller.direction(), Some(Direction::Forward));

    assert_eq!(
        actuator.commands,
        vec![MotionCommand::Backward, MotionCommand::Forward]
    );
    assert_eq!(state.frame_number(), Some(4));
}

#[test]
fn test_tick_uses_newest_pose() {
    let mut ingest =
        UdpIngest::bind("127.0.0.1:0", Duration::from_millis(50), DecodeMode::Strict).unwrap();
    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    sender.connect(ingest.local_addr().unwrap()).unwrap();

    let mut state = TrackerState::new("RIGID01");
    let mut actuator = RecordingActuator::default();
    let mut controller = ShuttleController::new(0.5, Duration::from_millis(1));

    // Several frames queue up between ticks; only the last one counts
    for (n, x) in [(1, 1000.0), (2, 1500.0), (3, 1200.0), (4, 950.0)] {
        sender.send(&FrameEncoder::single(n, &rigid01(x))).unwrap();
    }
    let decision = controller
        .tick(&mut ingest, &mut state, &mut actuator)
        .unwrap();

    assert_relative_eq!(state.relative().unwrap().x, -5.0, epsilon = 1e-9);
    assert_eq!(decision, Some(Direction::Forward));
    assert_eq!(ingest.frames_decoded(), 4);
}

#[test]
fn test_bad_datagrams_keep_previous_state() {
    let mut ingest =
        UdpIngest::bind("127.0.0.1:0", Duration::from_millis(50), DecodeMode::Strict).unwrap();
    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    sender.connect(ingest.local_addr().unwrap()).unwrap();

    let mut state = TrackerState::new("RIGID01");
    let mut actuator = RecordingActuator::default();
    let mut controller = ShuttleController::new(0.5, Duration::from_millis(1));

    sender.send(&FrameEncoder::single(1, &rigid01(1000.0))).unwrap();
    sender.send(&FrameEncoder::single(2, &rigid01(1100.0))).unwrap();
    sender.send(&[0xFFu8; 64]).unwrap();
    let schema_broken = FrameEncoder::new(3).push_raw(9, 72, &rigid01(5000.0)).finish();
    sender.send(&schema_broken).unwrap();

    controller
        .tick(&mut ingest, &mut state, &mut actuator)
        .unwrap();

    assert_relative_eq!(state.relative().unwrap().x, 10.0, epsilon = 1e-9);
    assert_eq!(ingest.frames_skipped(), 2);
    assert_eq!(actuator.commands, vec![MotionCommand::Backward]);
}
