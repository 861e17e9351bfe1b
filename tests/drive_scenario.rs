//! Controller ↔ vehicle scenarios driven step by step, frames handed across
//! by hand so every instant is explicit.
use embassy_time::Instant;
use loco_can::core::Uuid;
use loco_can::protocol::heartbeat::LivenessState;
use loco_can::protocol::messages::{
    DriveCommand, Heartbeat, HeartbeatSource, LocoMessage, VehicleStatus,
};
use loco_can::protocol::node::vehicle::VehicleSensors;
use loco_can::protocol::node::{ControllerNode, LocoNode, NodeConfig, Outbox, VehicleNode};
use loco_can::protocol::transport::can_frame::CanFrame;

const CONTROLLER: Uuid = 0xC001;
const VEHICLE: Uuid = 0x1111;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// One tick of the controller, its frames delivered to the vehicle, then one
/// tick of the vehicle, its frames delivered to the controller.
fn exchange(
    controller: &mut ControllerNode<4>,
    vehicle: &mut VehicleNode<2>,
    ms: u64,
) -> (Vec<CanFrame>, Vec<CanFrame>) {
    let mut from_controller = Outbox::new();
    controller.on_tick(at(ms), &mut from_controller).unwrap();
    let mut from_vehicle = Outbox::new();
    for frame in from_controller.iter() {
        vehicle.on_frame(frame, at(ms), &mut from_vehicle).unwrap();
    }
    vehicle.on_tick(at(ms), &mut from_vehicle).unwrap();
    let mut echo = Outbox::new();
    for frame in from_vehicle.iter() {
        controller.on_frame(frame, at(ms), &mut echo).unwrap();
    }
    (from_controller.to_vec(), from_vehicle.to_vec())
}

#[test]
fn test_drive_command_and_status_round_trip() {
    let mut controller: ControllerNode<4> = ControllerNode::new(CONTROLLER, NodeConfig::default());
    let mut vehicle: VehicleNode<2> = VehicleNode::new(VEHICLE, NodeConfig::default());
    vehicle.set_sensors(VehicleSensors {
        moving: true,
        ..Default::default()
    });

    controller.set_mains(true);
    controller.start_drive(at(0));
    controller.set_values(500, 200, 0).unwrap();
    controller.set_direction(false);

    // First tick: heartbeat reaches the vehicle before the drive command.
    let (sent, _) = exchange(&mut controller, &mut vehicle, 0);
    let command = sent
        .iter()
        .find_map(|frame| match LocoMessage::decode(frame) {
            Ok(LocoMessage::Drive(command)) => Some(command),
            _ => None,
        })
        .expect("controller sent no drive command");
    assert_eq!(
        command,
        DriveCommand {
            mains: true,
            drive: true,
            dir: false,
            drive_value: 500,
            power_value: 200,
            brake_value: 0,
            ..Default::default()
        }
    );
    assert_eq!(vehicle.command(), &command);

    let status = controller.vehicle(VEHICLE).expect("no status from vehicle");
    assert_eq!(
        *status,
        VehicleStatus {
            mains: true,
            drive: true,
            moving: true,
            uuid: VEHICLE,
            ..Default::default()
        }
    );
    assert_eq!(controller.module_state(VEHICLE), LivenessState::Alive);
}

#[test]
/// The lantern set grows during drive: the controller goes silent and the
/// vehicle stops once the timeout has passed.
fn test_lantern_change_stops_vehicle() {
    let mut controller: ControllerNode<4> = ControllerNode::new(CONTROLLER, NodeConfig::default());
    let mut vehicle: VehicleNode<2> = VehicleNode::new(VEHICLE, NodeConfig::default());
    let lantern = |uuid: Uuid| {
        Heartbeat::new(HeartbeatSource::TrainEnd, uuid)
            .encode()
            .unwrap()
    };
    let mut scratch = Outbox::new();

    controller.set_mains(true);
    controller.on_frame(&lantern(0xAAAA), at(0), &mut scratch).unwrap();
    controller.start_drive(at(0));
    controller.set_values(300, 1023, 0).unwrap();
    assert_eq!(controller.drive_heartbeat().captured(), &[0xAAAA]);

    let mut last_heartbeat = 0;
    for ms in (0..=400).step_by(50) {
        let (sent, _) = exchange(&mut controller, &mut vehicle, ms);
        if sent.iter().any(|f| f.id().base() == 0x010) {
            last_heartbeat = ms;
        }
    }
    assert!(!vehicle.safe_stop());
    assert_eq!(vehicle.output().drive_value, 300);

    controller.on_frame(&lantern(0xAAAA), at(420), &mut scratch).unwrap();
    controller.on_frame(&lantern(0xBBBB), at(420), &mut scratch).unwrap();
    assert!(!controller.heartbeat_healthy());

    for ms in (450..=1400).step_by(50) {
        let (sent, _) = exchange(&mut controller, &mut vehicle, ms);
        assert!(sent.iter().all(|f| f.id().base() != 0x010));
        if ms - last_heartbeat <= 1000 {
            assert!(!vehicle.safe_stop(), "stopped early at {ms} ms");
        }
    }
    assert!(vehicle.safe_stop());
    assert_eq!(vehicle.output().drive_value, 0);
    assert_eq!(vehicle.controllers().state(CONTROLLER), LivenessState::Lost);
    assert!(!controller.vehicle(VEHICLE).unwrap().drive);
}
