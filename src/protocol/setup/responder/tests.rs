//! Responder behavior against an in-memory module store.
use super::*;
use crate::core::{BoardVersion, ModuleType};
use crate::error::DecodeError;
use crate::protocol::setup::message::{request, set_data, set_name};

#[derive(Default)]
struct MemoryStore {
    saved: Option<Module>,
    data: Vec<(u8, Vec<u8, 6>), 4>,
    fail: bool,
}

impl ModuleStore for MemoryStore {
    type Error = &'static str;

    fn load(&mut self, uuid: Uuid) -> Result<Module, Self::Error> {
        Ok(self.saved.clone().unwrap_or_else(|| {
            Module::new(uuid, ModuleType::SENSOR, BoardVersion::V2_0).with_name("DEFAULT")
        }))
    }

    fn save(&mut self, module: &Module) -> Result<(), Self::Error> {
        if self.fail {
            return Err("eeprom");
        }
        self.saved = Some(module.clone());
        Ok(())
    }

    fn write_data(&mut self, _uuid: Uuid, data_id: u8, value: &[u8]) -> Result<(), Self::Error> {
        let value = Vec::from_slice(value).map_err(|_| "value")?;
        self.data.push((data_id, value)).map_err(|_| "full")
    }
}

fn responder(uuid: Uuid) -> SetupResponder<MemoryStore> {
    SetupResponder::boot(MemoryStore::default(), uuid).unwrap()
}

#[test]
fn test_boot_loads_defaults() {
    let responder = responder(0x1234);
    assert_eq!(responder.uuid(), 0x1234);
    assert_eq!(responder.module().name.as_str(), "DEFAULT");
}

#[test]
/// A request is answered whatever the addressing.
fn test_request_is_answered() {
    let mut responder = responder(0x1234);
    let SetupOutcome::Describe(replies) = responder.handle(&request()).unwrap() else {
        panic!("request must be answered");
    };
    assert_eq!(replies.len(), DESCRIBE_REPLIES);
    for frame in replies.iter() {
        assert_eq!(frame.id().sender_uuid(), Some(0x1234));
    }
    assert_eq!(replies[0].id().base(), 0x780);
    assert_eq!(replies[0].payload(), b"DEFAULT");
    assert_eq!(replies[1].id().base(), 0x781);
    assert!(replies[1].is_empty());
    assert_eq!(replies[2].id().base(), 0x782);
    assert_eq!(replies[2].payload(), &[0x20, 0x03]);
}

#[test]
/// Names longer than one frame spill into the tail reply.
fn test_long_name_split() {
    let module = Module::new(1, ModuleType::CONTROLLER, BoardVersion::V1_2).with_name("BR-218-DIESEL");
    let responder = SetupResponder::new(module, MemoryStore::default());
    let replies = responder.describe().unwrap();
    assert_eq!(replies[0].payload(), b"BR-218-D");
    assert_eq!(replies[1].payload(), b"IESEL");
}

#[test]
fn test_set_name_addressed() {
    let mut responder = responder(0x1234);
    let outcome = responder.handle(&set_name(0x1234, "LOCO").unwrap()).unwrap();
    assert_eq!(outcome, SetupOutcome::NameUpdated);
    assert_eq!(responder.module().name.as_str(), "LOCO");
    assert_eq!(responder.store().saved.as_ref().unwrap().name.as_str(), "LOCO");
}

#[test]
/// Writes for another UUID leave the module untouched and produce no reply.
fn test_set_name_other_module() {
    let mut responder = responder(0x5678);
    let outcome = responder.handle(&set_name(0x1234, "LOCO").unwrap()).unwrap();
    assert_eq!(outcome, SetupOutcome::Discarded);
    assert_eq!(responder.module().name.as_str(), "DEFAULT");
    assert!(responder.store().saved.is_none());
}

#[test]
fn test_set_data() {
    let mut responder = responder(0x1234);
    let outcome = responder
        .handle(&set_data(0x1234, 0x10, &[1, 2]).unwrap())
        .unwrap();
    assert_eq!(outcome, SetupOutcome::DataWritten { data_id: 0x10 });
    assert_eq!(responder.store().data[0].0, 0x10);
    assert_eq!(responder.store().data[0].1.as_slice(), &[1, 2]);
}

#[test]
fn test_store_failure_propagates() {
    let store = MemoryStore {
        fail: true,
        ..Default::default()
    };
    let mut responder = SetupResponder::boot(store, 0x1234).unwrap();
    assert!(matches!(
        responder.handle(&set_name(0x1234, "X").unwrap()),
        Err(SetupError::Store("eeprom"))
    ));
}

#[test]
fn test_foreign_replies_ignored_and_garbage_reported() {
    let mut responder = responder(0x1234);
    let other = reply(0x00, b"OTHER", 0x9999).unwrap();
    assert_eq!(responder.handle(&other).unwrap(), SetupOutcome::Ignored);

    let garbage = CanFrame::standard(0x600, &[0x12]).unwrap();
    assert!(matches!(
        responder.handle(&garbage),
        Err(SetupError::Decode(DecodeError::TooShort { .. }))
    ));
}
