//! Module side of the setup protocol: answers discovery requests and applies
//! name/data writes addressed to this module.
use heapless::Vec;

use crate::core::{Module, Uuid};
use crate::error::{EncodeError, SetupError};
use crate::protocol::setup::message::{reply, SetupMessage};
use crate::protocol::setup::{INFO_MODULE_TYPE, INFO_NAME_HEAD, INFO_NAME_TAIL};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::module_store::ModuleStore;
use crate::protocol::transport::MAX_FRAME_LEN;

/// Number of replies sent for one request.
pub const DESCRIBE_REPLIES: usize = 3;

/// Replies answering a request.
pub type DescribeReplies = Vec<CanFrame, DESCRIBE_REPLIES>;

/// Result of handling one setup frame.
#[derive(Debug, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Request answered; the frames must be sent in order.
    Describe(DescribeReplies),
    /// Module name replaced and persisted.
    NameUpdated,
    /// Data slot persisted.
    DataWritten { data_id: u8 },
    /// Write addressed to another module, dropped without a reply.
    Discarded,
    /// Replies from other modules are of no interest to a responder.
    Ignored,
}

/// Setup endpoint of a module.
pub struct SetupResponder<S: ModuleStore> {
    module: Module,
    store: S,
}

impl<S: ModuleStore> SetupResponder<S> {
    /// Load the module record for `uuid` from the store.
    pub fn boot(mut store: S, uuid: Uuid) -> Result<Self, S::Error> {
        let module = store.load(uuid)?;
        Ok(Self { module, store })
    }

    /// Wrap an already loaded module.
    pub fn new(module: Module, store: S) -> Self {
        Self { module, store }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn uuid(&self) -> Uuid {
        self.module.uuid
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle a frame from the setup range.
    pub fn handle(&mut self, frame: &CanFrame) -> Result<SetupOutcome, SetupError<S::Error>> {
        let Some(message) = SetupMessage::decode_for(frame, self.module.uuid)? else {
            #[cfg(feature = "defmt")]
            defmt::trace!("Setup write for another module, discarded");
            return Ok(SetupOutcome::Discarded);
        };

        match message {
            SetupMessage::Request => Ok(SetupOutcome::Describe(self.describe()?)),
            SetupMessage::Reply { .. } => Ok(SetupOutcome::Ignored),
            SetupMessage::SetName { name, .. } => {
                self.module.set_name(&name);
                self.store.save(&self.module).map_err(SetupError::Store)?;
                #[cfg(feature = "defmt")]
                defmt::info!("Module {=u16:#x} renamed to {=str}", self.module.uuid, name.as_str());
                Ok(SetupOutcome::NameUpdated)
            }
            SetupMessage::SetData { data_id, value, .. } => {
                self.store
                    .write_data(self.module.uuid, data_id, &value)
                    .map_err(SetupError::Store)?;
                Ok(SetupOutcome::DataWritten { data_id })
            }
        }
    }

    /// Describe replies: name head, name tail, then type and board codes.
    pub fn describe(&self) -> Result<DescribeReplies, EncodeError> {
        let uuid = self.module.uuid;
        let name = self.module.name.as_bytes();
        let (head, tail) = name.split_at(name.len().min(MAX_FRAME_LEN));
        let type_info = [self.module.module_type.0, self.module.board.code()];

        let mut replies = DescribeReplies::new();
        for frame in [
            reply(INFO_NAME_HEAD, head, uuid)?,
            reply(INFO_NAME_TAIL, tail, uuid)?,
            reply(INFO_MODULE_TYPE, &type_info, uuid)?,
        ] {
            // Capacity matches the number of replies built above.
            let _ = replies.push(frame);
        }
        Ok(replies)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
