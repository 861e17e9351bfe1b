//! State machine of the liveness table.
use super::*;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

#[test]
fn test_unknown_until_seen() {
    let mut monitor: HeartbeatMonitor<4> = HeartbeatMonitor::new();
    assert_eq!(monitor.state(0x1111), LivenessState::Unknown);
    assert!(!monitor.healthy());
    assert_eq!(monitor.observe(0x1111, at(0)), Ok(LivenessState::Unknown));
    assert_eq!(monitor.state(0x1111), LivenessState::Alive);
    assert!(monitor.healthy());
}

#[test]
/// Lost strictly after the timeout, restored by a fresh heartbeat.
fn test_timeout_boundary_and_recovery() {
    let t = 10_000;
    let mut monitor: HeartbeatMonitor<4> = HeartbeatMonitor::new();
    monitor.observe(0x1111, at(t)).unwrap();

    assert_eq!(monitor.check(at(t + 999)), 0);
    assert_eq!(monitor.state(0x1111), LivenessState::Alive);
    assert_eq!(monitor.check(at(t + 1000)), 0);

    assert_eq!(monitor.check(at(t + 1001)), 1);
    assert_eq!(monitor.state(0x1111), LivenessState::Lost);
    assert!(!monitor.healthy());
    // Already lost, not counted twice.
    assert_eq!(monitor.check(at(t + 1500)), 0);

    assert_eq!(monitor.observe(0x1111, at(t + 1001)), Ok(LivenessState::Lost));
    assert_eq!(monitor.state(0x1111), LivenessState::Alive);
    assert_eq!(monitor.last_seen(0x1111), Some(at(t + 1001)));
}

#[test]
fn test_refresh_keeps_alive() {
    let mut monitor: HeartbeatMonitor<2> = HeartbeatMonitor::new();
    for ms in (0..5000).step_by(500) {
        monitor.observe(0x0001, at(ms)).unwrap();
        assert_eq!(monitor.check(at(ms + 499)), 0);
    }
    assert!(monitor.healthy());
}

#[test]
fn test_one_lost_module_makes_table_unhealthy() {
    let mut monitor: HeartbeatMonitor<4> = HeartbeatMonitor::new();
    monitor.observe(1, at(0)).unwrap();
    monitor.observe(2, at(600)).unwrap();
    assert_eq!(monitor.check(at(1200)), 1);
    assert_eq!(monitor.state(1), LivenessState::Lost);
    assert_eq!(monitor.state(2), LivenessState::Alive);
    assert!(!monitor.healthy());
    let alive: heapless::Vec<Uuid, 4> = monitor.alive().collect();
    assert_eq!(alive.as_slice(), &[2]);
}

#[test]
fn test_table_full() {
    let mut monitor: HeartbeatMonitor<1> = HeartbeatMonitor::new();
    monitor.observe(1, at(0)).unwrap();
    assert_eq!(
        monitor.observe(2, at(0)),
        Err(HeartbeatError::TableFull { capacity: 1 })
    );
    // Known modules can still be refreshed.
    assert!(monitor.observe(1, at(10)).is_ok());
    assert_eq!(monitor.len(), 1);
}

#[test]
fn test_custom_timeout() {
    let mut monitor: HeartbeatMonitor<1> =
        HeartbeatMonitor::with_timeout(Duration::from_millis(200));
    monitor.observe(7, at(0)).unwrap();
    assert_eq!(monitor.check(at(201)), 1);
}

#[test]
/// A full table recycles the slot of the module lost the longest.
fn test_full_table_reuses_oldest_lost() {
    let mut monitor: HeartbeatMonitor<2> = HeartbeatMonitor::new();
    monitor.observe(1, at(0)).unwrap();
    monitor.observe(2, at(300)).unwrap();
    assert_eq!(monitor.check(at(1400)), 2);

    assert_eq!(monitor.observe(3, at(1400)), Ok(LivenessState::Unknown));
    assert_eq!(monitor.len(), 2);
    assert_eq!(monitor.state(1), LivenessState::Unknown);
    assert_eq!(monitor.state(2), LivenessState::Lost);
    assert_eq!(monitor.state(3), LivenessState::Alive);

    assert_eq!(monitor.observe(4, at(1500)), Ok(LivenessState::Unknown));
    assert_eq!(monitor.state(2), LivenessState::Unknown);
    assert!(monitor.healthy());

    // Every slot alive: nothing to give up.
    assert_eq!(
        monitor.observe(5, at(1500)),
        Err(HeartbeatError::TableFull { capacity: 2 })
    );
}
