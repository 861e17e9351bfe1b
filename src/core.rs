//! Domain types shared by the codecs, the heartbeat monitor and the setup
//! protocol: module identity, module type codes and board revisions.

/// 16-bit unique module identifier, assigned out-of-band (usually derived
/// from the MCU serial number).
pub type Uuid = u16;

/// Maximum length of a module name in bytes.
pub const MODULE_NAME_LENGTH: usize = 15;

/// Human-readable module name, persisted by the module store.
pub type ModuleName = heapless::String<MODULE_NAME_LENGTH>;

//==================================================================================MODULE_TYPE
/// 8-bit module type code.
///
/// Bit 7 flags wireless ability, bits 4-6 hold the type group and bits 0-3 the
/// subgroup. Eight groups with sixteen subgroups each are available for both
/// wired and wireless modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleType(pub u8);

impl ModuleType {
    /// Wired controller module.
    pub const CONTROLLER: Self = Self(0x10);
    /// WiFi controller module.
    pub const CONTROLLER_WIFI: Self = Self(0x90);
    /// UI sensor module.
    pub const SENSOR: Self = Self(0x20);
    /// Switch module.
    pub const SWITCH: Self = Self(0x30);
    /// Servo actuator module.
    pub const SERVO: Self = Self(0x40);

    const WIRELESS_BIT: u8 = 0x80;

    /// Build a type code from its parts. Out-of-range parts are masked.
    pub const fn new(group: u8, subgroup: u8, wireless: bool) -> Self {
        let wireless = if wireless { Self::WIRELESS_BIT } else { 0 };
        Self(wireless | ((group & 0x07) << 4) | (subgroup & 0x0F))
    }

    /// Type group (bits 4-6).
    pub const fn group(&self) -> u8 {
        (self.0 >> 4) & 0x07
    }

    /// Subgroup inside the type group (bits 0-3).
    pub const fn subgroup(&self) -> u8 {
        self.0 & 0x0F
    }

    /// Whether the module talks over a wireless link.
    pub const fn is_wireless(&self) -> bool {
        self.0 & Self::WIRELESS_BIT != 0
    }

    /// Same type, ignoring the wireless bit.
    pub const fn same_kind(&self, other: ModuleType) -> bool {
        (self.0 & !Self::WIRELESS_BIT) == (other.0 & !Self::WIRELESS_BIT)
    }
}

//==================================================================================BOARD_VERSION
/// Hardware revision of the module board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardVersion {
    V1_0,
    V1_2,
    V2_0,
    WifiV2_1,
    UniversalV2_1,
    MicroV2_2,
    Digispark,
    /// Code not known by this version of the library.
    Unknown(u8),
}

impl BoardVersion {
    /// Wire code of the revision.
    pub const fn code(&self) -> u8 {
        match self {
            BoardVersion::V1_0 => 0x01,
            BoardVersion::V1_2 => 0x02,
            BoardVersion::V2_0 => 0x03,
            BoardVersion::WifiV2_1 => 0x04,
            BoardVersion::UniversalV2_1 => 0x05,
            BoardVersion::MicroV2_2 => 0x70,
            BoardVersion::Digispark => 0xFF,
            BoardVersion::Unknown(code) => *code,
        }
    }
}

impl From<u8> for BoardVersion {
    fn from(code: u8) -> Self {
        match code {
            0x01 => BoardVersion::V1_0,
            0x02 => BoardVersion::V1_2,
            0x03 => BoardVersion::V2_0,
            0x04 => BoardVersion::WifiV2_1,
            0x05 => BoardVersion::UniversalV2_1,
            0x70 => BoardVersion::MicroV2_2,
            0xFF => BoardVersion::Digispark,
            other => BoardVersion::Unknown(other),
        }
    }
}

//==================================================================================MODULE
/// An addressable bus participant (controller, vehicle, sensor, actuator).
///
/// Created at boot from the module store (or defaulted), mutated through the
/// setup protocol and never destroyed at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub uuid: Uuid,
    pub module_type: ModuleType,
    pub board: BoardVersion,
    pub name: ModuleName,
}

impl Module {
    /// Module with an empty name.
    pub fn new(uuid: Uuid, module_type: ModuleType, board: BoardVersion) -> Self {
        Self {
            uuid,
            module_type,
            board,
            name: ModuleName::new(),
        }
    }

    /// Replace the module name. Names longer than [`MODULE_NAME_LENGTH`] bytes
    /// are cut on the last character boundary that fits.
    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        for c in name.chars() {
            if self.name.push(c).is_err() {
                break;
            }
        }
    }

    /// Builder-style variant of [`Module::set_name`].
    pub fn with_name(mut self, name: &str) -> Self {
        self.set_name(name);
        self
    }
}
