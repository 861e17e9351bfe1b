//! Light status, one flag per lamp group.
//!
//! ```text
//! byte 0:   7      6      5      4      3      2      1      0
//!          main  train   cab   instr   back   high   low   posit
//! ```
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::traits::{first_byte, LocoPayload};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{MessageKind, ID_LIGHT};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightStatus {
    /// Position light.
    pub posit: bool,
    /// Low spot light.
    pub low: bool,
    /// Bright spot light.
    pub high: bool,
    /// Back light.
    pub back: bool,
    /// Instrument light.
    pub instr: bool,
    /// Cabin light.
    pub cab: bool,
    /// Train lights.
    pub train: bool,
    /// Main light switch.
    pub main: bool,
}

impl LightStatus {
    /// Pack the flags into the wire byte.
    pub fn to_byte(&self) -> u8 {
        [
            self.posit, self.low, self.high, self.back, self.instr, self.cab, self.train, self.main,
        ]
        .iter()
        .enumerate()
        .fold(0, |byte, (bit, on)| byte | ((*on as u8) << bit))
    }

    pub fn from_byte(byte: u8) -> Self {
        let bit = |n: u8| byte & (1 << n) != 0;
        Self {
            posit: bit(0),
            low: bit(1),
            high: bit(2),
            back: bit(3),
            instr: bit(4),
            cab: bit(5),
            train: bit(6),
            main: bit(7),
        }
    }
}

impl LocoPayload for LightStatus {
    const KIND: MessageKind = MessageKind::Light;
    const MIN_LEN: usize = 1;

    fn encode(&self) -> Result<CanFrame, EncodeError> {
        Ok(CanFrame::standard(ID_LIGHT, &[self.to_byte()])?)
    }

    fn decode_payload(frame: &CanFrame) -> Result<Self, DecodeError> {
        let byte = first_byte(frame)?;
        Ok(Self::from_byte(byte))
    }
}
