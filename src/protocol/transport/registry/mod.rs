//! Static identifier registry.
//!
//! The 11-bit namespace is partitioned by its leading nibble and the bus
//! arbitrates on the identifier value, so the allocation below is also the
//! priority order: `0x0xx` safety heartbeats, `0x1xx`-`0x3xx` telemetry,
//! `0x4xx` commands, `0x5xx` status, `0x6xx`/`0x7xx` setup.
use crate::protocol::transport::can_id::matches;

//==================================================================================IDENTIFIERS
pub const ID_DRIVE_HEARTBEAT: u16 = 0x010;
pub const ID_TRAIN_END_HEARTBEAT: u16 = 0x020;

pub const ID_CURRENT: u16 = 0x100;
pub const ID_MOTOR_CURRENT: u16 = 0x110;
pub const ID_BATTERY_CURRENT: u16 = 0x120;
pub const ID_LIGHT_CURRENT: u16 = 0x130;

pub const ID_SPEED: u16 = 0x200;
pub const ID_DIRECTION: u16 = 0x210;
pub const ID_SIGNAL: u16 = 0x220;
pub const ID_TACHO: u16 = 0x230;

/// Main supply voltage.
pub const ID_VOLTAGE: u16 = 0x300;
pub const ID_MOTOR_VOLTAGE: u16 = 0x310;
pub const ID_BATTERY_VOLTAGE: u16 = 0x320;
pub const ID_BATTERY_1_VOLTAGE: u16 = 0x321;
pub const ID_BATTERY_2_VOLTAGE: u16 = 0x322;

pub const ID_DRIVE: u16 = 0x400;
pub const ID_LIGHT: u16 = 0x410;
pub const ID_SWITCH: u16 = 0x420;
pub const ID_LOCO_SETUP: u16 = 0x430;

pub const ID_DRIVE_STATUS: u16 = 0x500;
/// Heartbeat sent by every module.
pub const ID_MODULE_HEARTBEAT: u16 = 0x510;

/// Name/data writes: `0x600 | data id`.
pub const ID_SETUP_WRITE: u16 = 0x600;
pub const SETUP_WRITE_MASK: u16 = 0x700;
/// Info replies: `0x780 | data id`, sender UUID in the extended identifier.
pub const ID_SETUP_REPLY: u16 = 0x780;
pub const SETUP_REPLY_MASK: u16 = 0x780;
/// Per-module variants only differ in the low nibble.
const MODULE_NUMBER_MASK: u16 = 0x7F0;

/// Unaddressed "describe yourself" request.
pub const ID_SETUP_REQUEST: u16 = 0x7FF;
pub const SETUP_REQUEST_MASK: u16 = 0x7FF;

//==================================================================================KINDS
/// Message category of an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    DriveHeartbeat,
    TrainEndHeartbeat,
    Current,
    MotorCurrent,
    BatteryCurrent,
    LightCurrent,
    Speed,
    Direction,
    Signal,
    Tacho,
    Voltage,
    MotorVoltage,
    BatteryVoltage,
    Battery1Voltage,
    Battery2Voltage,
    Drive,
    Light,
    Switch,
    LocoSetup,
    DriveStatus,
    ModuleHeartbeat,
    SetupWrite,
    SetupReply,
    SetupRequest,
}

/// Priority class, declared from highest to lowest bus priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityClass {
    Safety,
    HighTelemetry,
    MidTelemetry,
    LowTelemetry,
    Command,
    Status,
    SetupWrite,
    SetupRequestReply,
}

/// One row of the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentifierEntry {
    pub id: u16,
    pub kind: MessageKind,
}

/// Fixed-value categories, ordered by identifier (and therefore priority).
pub static REGISTRY: [IdentifierEntry; 23] = [
    entry(ID_DRIVE_HEARTBEAT, MessageKind::DriveHeartbeat),
    entry(ID_TRAIN_END_HEARTBEAT, MessageKind::TrainEndHeartbeat),
    entry(ID_CURRENT, MessageKind::Current),
    entry(ID_MOTOR_CURRENT, MessageKind::MotorCurrent),
    entry(ID_BATTERY_CURRENT, MessageKind::BatteryCurrent),
    entry(ID_LIGHT_CURRENT, MessageKind::LightCurrent),
    entry(ID_SPEED, MessageKind::Speed),
    entry(ID_DIRECTION, MessageKind::Direction),
    entry(ID_SIGNAL, MessageKind::Signal),
    entry(ID_TACHO, MessageKind::Tacho),
    entry(ID_VOLTAGE, MessageKind::Voltage),
    entry(ID_MOTOR_VOLTAGE, MessageKind::MotorVoltage),
    entry(ID_BATTERY_VOLTAGE, MessageKind::BatteryVoltage),
    entry(ID_BATTERY_1_VOLTAGE, MessageKind::Battery1Voltage),
    entry(ID_BATTERY_2_VOLTAGE, MessageKind::Battery2Voltage),
    entry(ID_DRIVE, MessageKind::Drive),
    entry(ID_LIGHT, MessageKind::Light),
    entry(ID_SWITCH, MessageKind::Switch),
    entry(ID_LOCO_SETUP, MessageKind::LocoSetup),
    entry(ID_DRIVE_STATUS, MessageKind::DriveStatus),
    entry(ID_MODULE_HEARTBEAT, MessageKind::ModuleHeartbeat),
    entry(ID_SETUP_WRITE, MessageKind::SetupWrite),
    entry(ID_SETUP_REQUEST, MessageKind::SetupRequest),
];

const fn entry(id: u16, kind: MessageKind) -> IdentifierEntry {
    IdentifierEntry { id, kind }
}

impl MessageKind {
    /// Canonical identifier used when emitting this category.
    pub fn identifier(&self) -> u16 {
        match self {
            MessageKind::SetupReply => ID_SETUP_REPLY,
            kind => REGISTRY
                .iter()
                .find(|entry| entry.kind == *kind)
                .map(|entry| entry.id)
                .unwrap_or(ID_SETUP_REQUEST),
        }
    }

    /// Arbitration class of the category.
    pub fn priority_class(&self) -> PriorityClass {
        use MessageKind::*;
        match self {
            DriveHeartbeat | TrainEndHeartbeat => PriorityClass::Safety,
            Current | MotorCurrent | BatteryCurrent | LightCurrent => PriorityClass::HighTelemetry,
            Speed | Direction | Signal | Tacho => PriorityClass::MidTelemetry,
            Voltage | MotorVoltage | BatteryVoltage | Battery1Voltage | Battery2Voltage => {
                PriorityClass::LowTelemetry
            }
            Drive | Light | Switch | LocoSetup => PriorityClass::Command,
            DriveStatus | ModuleHeartbeat => PriorityClass::Status,
            SetupWrite => PriorityClass::SetupWrite,
            SetupReply | SetupRequest => PriorityClass::SetupRequestReply,
        }
    }

    /// Heartbeat categories feed the liveness monitor.
    pub fn is_heartbeat(&self) -> bool {
        matches!(
            self,
            MessageKind::DriveHeartbeat
                | MessageKind::TrainEndHeartbeat
                | MessageKind::ModuleHeartbeat
        )
    }
}

//==================================================================================CLASSIFY
/// Map an 11-bit identifier to its category, or `None` when unrecognized.
///
/// Setup ranges are tested first (request, reply, write), then exact
/// registry values, then registry values with the low nibble ignored so that
/// per-module variants (`0x511`, `0x41A`...) resolve to their category.
/// `0x700`-`0x77F` is neither a write nor a reply and stays unrecognized.
pub fn classify(identifier: u16) -> Option<MessageKind> {
    if identifier > 0x7FF {
        return None;
    }
    if matches(identifier, SETUP_REQUEST_MASK, ID_SETUP_REQUEST) {
        return Some(MessageKind::SetupRequest);
    }
    if matches(identifier, SETUP_REPLY_MASK, ID_SETUP_REPLY) {
        return Some(MessageKind::SetupReply);
    }
    if matches(identifier, SETUP_WRITE_MASK, ID_SETUP_WRITE) {
        return Some(MessageKind::SetupWrite);
    }
    if let Some(entry) = REGISTRY.iter().find(|entry| entry.id == identifier) {
        return Some(entry.kind);
    }
    REGISTRY
        .iter()
        .filter(|entry| entry.id < ID_SETUP_WRITE)
        .find(|entry| matches(identifier, MODULE_NUMBER_MASK, entry.id))
        .map(|entry| entry.kind)
}
