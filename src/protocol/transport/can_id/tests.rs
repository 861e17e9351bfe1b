//! Unit tests for the `CanId` accessors and arbitration order.
use super::*;

#[test]
fn test_standard_bounds() {
    assert_eq!(CanId::standard(0x7FF).unwrap().base(), 0x7FF);
    assert_eq!(
        CanId::standard(0x800),
        Err(FrameError::InvalidIdentifier { raw: 0x800 })
    );
}

#[test]
/// The UUID lands in the extension while the base stays readable.
fn test_extended_with_uuid() {
    let id = CanId::with_uuid(0x781, 0xBEEF).unwrap();
    assert!(id.is_extended());
    assert_eq!(id.base(), 0x781);
    assert_eq!(id.extension(), Some(0xBEEF));
    assert_eq!(id.sender_uuid(), Some(0xBEEF));
    assert_eq!(id.inner(), Id::Extended(ExtendedId::new(0x781 << 18 | 0xBEEF).unwrap()));
}

#[test]
fn test_standard_has_no_uuid() {
    let id = CanId::standard(0x600).unwrap();
    assert_eq!(id.extension(), None);
    assert_eq!(id.sender_uuid(), None);
}

#[test]
fn test_mask_matching() {
    assert!(matches(0x7FF, 0x7FF, 0x7FF));
    assert!(!matches(0x7FE, 0x7FF, 0x7FF));
    assert!(matches(0x785, 0x780, 0x780));
    assert!(matches(0x6A0, 0x700, 0x600));
    assert!(!matches(0x5A0, 0x700, 0x600));
    // Bus filter ignores bit 3 and the module-number nibble.
    assert!(CanId::standard(0x51B).unwrap().matches(0x770, 0x510));
}

#[test]
/// Safety heartbeats beat everything else on the bus.
fn test_arbitration_order() {
    let heartbeat = CanId::standard(0x010).unwrap();
    let drive = CanId::standard(0x400).unwrap();
    let current = CanId::standard(0x100).unwrap();
    assert!(heartbeat.arbitrates_before(&current));
    assert!(current.arbitrates_before(&drive));
    assert!(!drive.arbitrates_before(&heartbeat));
}

#[test]
/// A standard identifier wins against an extended one with the same base.
fn test_arbitration_standard_before_extended() {
    let write = CanId::standard(0x780).unwrap();
    let reply = CanId::with_uuid(0x780, 0x0001).unwrap();
    let other_reply = CanId::with_uuid(0x780, 0x0002).unwrap();
    assert!(write.arbitrates_before(&reply));
    assert!(reply.arbitrates_before(&other_reply));
    assert_eq!(reply.arbitration_cmp(&reply), Ordering::Equal);
}
