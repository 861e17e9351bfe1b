use super::*;

const CONTROLLER: Uuid = 0xC001;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn controller() -> ControllerNode<4> {
    ControllerNode::new(CONTROLLER, NodeConfig::default())
}

fn lantern(uuid: Uuid) -> CanFrame {
    Heartbeat::new(HeartbeatSource::TrainEnd, uuid).encode().unwrap()
}

fn tick_ids(node: &mut ControllerNode<4>, ms: u64) -> heapless::Vec<u16, 4> {
    let mut outbox = Outbox::new();
    node.on_tick(at(ms), &mut outbox).unwrap();
    outbox.iter().map(|frame| frame.id().base()).collect()
}

#[test]
fn test_quiet_with_mains_off() {
    let mut node = controller();
    assert!(tick_ids(&mut node, 0).is_empty());
}

#[test]
/// Heartbeat every 500 ms, drive command every 250 ms.
fn test_periodic_traffic() {
    let mut node = controller();
    node.set_mains(true);
    assert_eq!(tick_ids(&mut node, 0).as_slice(), &[0x010, 0x400]);
    assert!(tick_ids(&mut node, 100).is_empty());
    assert_eq!(tick_ids(&mut node, 250).as_slice(), &[0x400]);
    assert_eq!(tick_ids(&mut node, 500).as_slice(), &[0x010, 0x400]);
}

#[test]
fn test_command_carries_values() {
    let mut node = controller();
    node.set_mains(true);
    node.start_drive(at(0));
    node.set_values(500, 200, 0).unwrap();
    let mut outbox = Outbox::new();
    node.on_tick(at(0), &mut outbox).unwrap();
    let command = DriveCommand::decode(&outbox[1]).unwrap();
    assert!(command.mains && command.drive && !command.dir);
    assert_eq!(
        (command.drive_value, command.power_value, command.brake_value),
        (500, 200, 0)
    );
}

#[test]
fn test_values_out_of_range_refused() {
    let mut node = controller();
    node.set_values(10, 10, 10).unwrap();
    assert_eq!(
        node.set_values(1024, 0, 0),
        Err(EncodeError::ValueOutOfRange {
            field: "drive_value",
            value: 1024,
            max: 1023
        })
    );
    assert_eq!(node.command().drive_value, 10);
}

#[test]
/// Lantern set change during drive silences the drive heartbeat only.
fn test_lantern_change_stops_heartbeat() {
    let mut node = controller();
    let mut outbox = Outbox::new();
    node.set_mains(true);
    node.on_frame(&lantern(0xAAAA), at(0), &mut outbox).unwrap();
    node.start_drive(at(0));
    assert_eq!(tick_ids(&mut node, 0).as_slice(), &[0x010, 0x400]);

    node.on_frame(&lantern(0xBBBB), at(100), &mut outbox).unwrap();
    assert!(!node.heartbeat_healthy());
    assert_eq!(tick_ids(&mut node, 500).as_slice(), &[0x400]);

    node.stop_drive();
    assert!(node.heartbeat_healthy());
    assert_eq!(tick_ids(&mut node, 1000).as_slice(), &[0x010, 0x400]);
}

#[test]
fn test_tracks_vehicle_status_and_modules() {
    let mut node = controller();
    let mut outbox = Outbox::new();
    let status = VehicleStatus {
        mains: true,
        drive: true,
        moving: true,
        uuid: 0x1111,
        ..Default::default()
    };
    node.on_frame(&status.encode().unwrap(), at(0), &mut outbox)
        .unwrap();
    let moved = VehicleStatus { moving: false, ..status };
    node.on_frame(&moved.encode().unwrap(), at(10), &mut outbox)
        .unwrap();
    assert_eq!(node.vehicles().len(), 1);
    assert_eq!(node.vehicle(0x1111), Some(&moved));

    let module = Heartbeat::new(HeartbeatSource::Module, 0x1111).encode().unwrap();
    node.on_frame(&module, at(0), &mut outbox).unwrap();
    assert_eq!(node.module_state(0x1111), LivenessState::Alive);
    node.on_tick(at(1001), &mut outbox).unwrap();
    assert_eq!(node.module_state(0x1111), LivenessState::Lost);
}
