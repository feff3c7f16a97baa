//! One wake's worth of output

use alloc::string::String;
use heapless::Vec;

use crate::constants::MAX_PROPERTIES;
use crate::property::PropertyId;

/// Property rendered into a batch, with the revision that was rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Staged {
    pub(crate) property: PropertyId,
    pub(crate) revision: u32,
}

/// Payload assembled by one evaluation, awaiting the publish result
///
/// Owns the staged property list, which plays the role of the per-wake
/// "set to publish" markers: dropping the batch clears them.
#[derive(Debug)]
pub struct Batch {
    pub(crate) payload: String,
    pub(crate) staged: Vec<Staged, MAX_PROPERTIES>,
}

impl Batch {
    /// Brace-wrapped payload to hand to the transport
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Properties included, in payload order
    pub fn properties(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.staged.iter().map(|s| s.property)
    }

    /// Number of properties included
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Always `false` for batches produced by a scheduler
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}
