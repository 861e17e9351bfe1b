//! Module discovery service: broadcast a setup request and collect the
//! describe replies of every module on the bus.
use heapless::Vec;

use crate::core::{BoardVersion, ModuleName, ModuleType, Uuid};
use crate::error::NodeError;
use crate::protocol::setup::message::{request, SetupMessage};
use crate::protocol::setup::{INFO_MODULE_TYPE, INFO_NAME_HEAD, INFO_NAME_TAIL};
use crate::protocol::transport::traits::{can_bus::CanBus, loco_timer::LocoTimer};
use crate::protocol::transport::MAX_FRAME_LEN;
use futures_util::future::{select, Either};
use futures_util::pin_mut;

//==================================================================================MODULE_DESCRIPTION
/// Description of a module assembled from its replies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleDescription {
    pub uuid: Uuid,
    name_head: Vec<u8, MAX_FRAME_LEN>,
    name_tail: Vec<u8, MAX_FRAME_LEN>,
    pub module_type: Option<ModuleType>,
    pub board: Option<BoardVersion>,
}

impl ModuleDescription {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            ..Default::default()
        }
    }

    /// Fold one reply into the description. Data ids other than the describe
    /// set are application specific and left alone.
    pub fn merge(&mut self, data_id: u8, text: &[u8]) {
        match data_id {
            INFO_NAME_HEAD => self.name_head = Vec::from_slice(text).unwrap_or_default(),
            INFO_NAME_TAIL => self.name_tail = Vec::from_slice(text).unwrap_or_default(),
            INFO_MODULE_TYPE => {
                if let [module_type, board, ..] = text {
                    self.module_type = Some(ModuleType(*module_type));
                    self.board = Some(BoardVersion::from(*board));
                }
            }
            _ => {}
        }
    }

    /// Module name, head and tail joined. Bytes that are not valid UTF-8 end
    /// the name.
    pub fn name(&self) -> ModuleName {
        let mut bytes: Vec<u8, { 2 * MAX_FRAME_LEN }> = Vec::new();
        // Both halves fit by construction.
        let _ = bytes.extend_from_slice(&self.name_head);
        let _ = bytes.extend_from_slice(&self.name_tail);

        let text = match core::str::from_utf8(&bytes) {
            Ok(text) => text,
            Err(err) => core::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
        };
        let mut name = ModuleName::new();
        for c in text.trim_end_matches('\0').chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        name
    }
}

//==================================================================================DISCOVERY
/// Broadcast a request and gather replies for `window_ms` milliseconds.
///
/// Returns the number of distinct modules written to `discovered`. Replies
/// from modules beyond the slice capacity are dropped; frames that are not
/// setup replies are ignored.
pub async fn request_module_discovery<C: CanBus, T: LocoTimer>(
    can_bus: &mut C,
    timer: &mut T,
    window_ms: u32,
    discovered: &mut [ModuleDescription],
) -> Result<usize, NodeError<C::Error>> {
    can_bus
        .send(&request())
        .await
        .map_err(NodeError::Send)?;

    let mut module_count = 0;
    let listen_duration = timer.delay_ms(window_ms);
    pin_mut!(listen_duration);

    loop {
        let recv = can_bus.recv();
        pin_mut!(recv);

        match select(listen_duration.as_mut(), recv).await {
            Either::Left(_) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Discovery window closed, {} modules found", module_count);
                return Ok(module_count);
            }
            Either::Right((incoming_frame, _)) => {
                let frame = incoming_frame.map_err(NodeError::Receive)?;
                let Ok(SetupMessage::Reply {
                    data_id,
                    sender,
                    text,
                }) = SetupMessage::decode(&frame)
                else {
                    continue;
                };

                let known = discovered[..module_count]
                    .iter()
                    .position(|d| d.uuid == sender);
                match known {
                    Some(index) => discovered[index].merge(data_id, &text),
                    None if module_count < discovered.len() => {
                        let mut description = ModuleDescription::new(sender);
                        description.merge(data_id, &text);
                        discovered[module_count] = description;
                        module_count += 1;
                    }
                    // Caller buffer full.
                    None => {}
                }
            }
        }
    }
}
