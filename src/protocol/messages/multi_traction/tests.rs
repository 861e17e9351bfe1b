use super::*;

#[test]
fn test_split_layout() {
    assert_eq!(split(0xFFFF), [0x3F, 0x3F, 0x0F]);
    assert_eq!(split(0x8000), [0x20, 0x00, 0x00]);
    assert_eq!(split(0x0010), [0x00, 0x01, 0x00]);
    assert_eq!(split(0x0001), [0x00, 0x00, 0x01]);
    assert_eq!(split(0x1234), [0x04, 0x23, 0x04]);
}

#[test]
/// Each UUID bit lands in exactly one slot and comes back unchanged.
fn test_every_bit_round_trips() {
    for bit in 0..16 {
        let uuid: Uuid = 1 << bit;
        assert_eq!(join(split(uuid)).unwrap(), uuid, "bit {bit}");
    }
}

#[test]
fn test_reserved_bits_rejected() {
    assert_eq!(
        join([0, 0, 0b01_0000]),
        Err(DecodeError::ReservedBits { bits: 0b0100_0000 })
    );
}

#[test]
/// The main UUID is ignored while the grouping is inactive.
fn test_inactive_equality() {
    let a = MultiTractionRef {
        active: false,
        main_uuid: 0x1234,
    };
    assert_eq!(a, MultiTractionRef::inactive());
    assert_eq!(a.main_uuid(), None);
    assert_ne!(MultiTractionRef::main(0x1234), MultiTractionRef::main(0x1235));
}
