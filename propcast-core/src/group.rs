//! Property Groups
//!
//! A group is a set of properties published on a common period. Membership
//! is ordered (insertion order is payload order), may overlap with other
//! groups, and only grows.
//!
//! With `only_if_changed` a due group contributes just the members whose
//! value changed since their last successful publication; otherwise every
//! enabled member is sent each period.

use core::num::NonZeroU8;

use heapless::Vec;

use crate::constants::{MAX_GROUPS, MAX_PROPERTIES};
use crate::errors::{PropertyError, PropertyResult};
use crate::property::{PropertyId, PropertyStore};
use crate::time::{self, Timestamp};

/// Handle to a group, 1-based and stable for the registry's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(NonZeroU8);

impl GroupId {
    /// Wrap a raw 1-based id; `0` is never a valid handle
    pub const fn new(raw: u8) -> Option<Self> {
        match NonZeroU8::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Raw 1-based id
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    const fn index(self) -> usize {
        self.0.get() as usize - 1
    }

    fn from_index(index: usize) -> Self {
        Self(NonZeroU8::MIN.saturating_add(index as u8))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for GroupId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "G{}", self.get())
    }
}

/// Properties sharing one publication period
#[derive(Debug, Clone)]
pub struct PropertyGroup {
    period_ms: u32,
    only_if_changed: bool,
    members: Vec<PropertyId, MAX_PROPERTIES>,
    last_publish_ms: Timestamp,
}

impl PropertyGroup {
    fn new(period_ms: u32, only_if_changed: bool) -> Self {
        Self {
            period_ms,
            only_if_changed,
            members: Vec::new(),
            last_publish_ms: 0,
        }
    }

    /// Minimum time between two evaluations
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Publish members only when they changed
    pub fn only_if_changed(&self) -> bool {
        self.only_if_changed
    }

    /// Members in insertion order
    pub fn members(&self) -> &[PropertyId] {
        &self.members
    }

    /// Whether `property` belongs to this group
    pub fn contains(&self, property: PropertyId) -> bool {
        self.members.contains(&property)
    }

    /// Last time this group was evaluated as due
    pub fn last_publish_ms(&self) -> Timestamp {
        self.last_publish_ms
    }

    /// Period elapsed at `now`, wraparound-safe
    pub fn is_due(&self, now: Timestamp) -> bool {
        time::is_due(self.last_publish_ms, now, self.period_ms)
    }

    pub(crate) fn mark_evaluated(&mut self, now: Timestamp) {
        self.last_publish_ms = now;
    }
}

/// Fixed-capacity group registry
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: Vec<PropertyGroup, MAX_GROUPS>,
}

impl GroupRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Create a group publishing every `period_ms`.
    ///
    /// Its timestamp starts at 0 and is aligned to the clock when a
    /// [`Scheduler`](crate::Scheduler) takes over the registry.
    ///
    /// # Errors
    ///
    /// `RegistryFull` once [`MAX_GROUPS`] groups exist.
    pub fn create(&mut self, period_ms: u32, only_if_changed: bool) -> PropertyResult<GroupId> {
        let index = self.groups.len();
        self.groups
            .push(PropertyGroup::new(period_ms, only_if_changed))
            .map_err(|_| PropertyError::RegistryFull { capacity: MAX_GROUPS })?;

        let id = GroupId::from_index(index);
        log_debug!(
            "created group #{} (period {} ms, only if changed: {})",
            id.get(),
            period_ms,
            only_if_changed
        );
        Ok(id)
    }

    /// Append `property` to `group`.
    ///
    /// # Errors
    ///
    /// `InvalidProperty` if `store` did not issue `property`, `InvalidGroup`
    /// for an unknown group, `AlreadyMember` for a repeated insertion.
    pub fn add_property(
        &mut self,
        store: &PropertyStore,
        property: PropertyId,
        group: GroupId,
    ) -> PropertyResult<()> {
        if !store.contains(property) {
            return Err(PropertyError::InvalidProperty);
        }
        let entry = self
            .groups
            .get_mut(group.index())
            .ok_or(PropertyError::InvalidGroup)?;
        if entry.contains(property) {
            return Err(PropertyError::AlreadyMember);
        }
        entry
            .members
            .push(property)
            .map_err(|_| PropertyError::RegistryFull { capacity: MAX_PROPERTIES })
    }

    /// Group behind `id`
    pub fn get(&self, id: GroupId) -> Option<&PropertyGroup> {
        self.groups.get(id.index())
    }

    /// Number of groups created
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// `true` until the first group is created
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups in creation order
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &PropertyGroup)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(index, group)| (GroupId::from_index(index), group))
    }

    pub(crate) fn groups_mut(&mut self) -> impl Iterator<Item = &mut PropertyGroup> {
        self.groups.iter_mut()
    }

    /// Treat `now` as the last evaluation of every group
    pub(crate) fn align_to(&mut self, now: Timestamp) {
        for group in self.groups.iter_mut() {
            group.last_publish_ms = now;
        }
    }
}
