//! Bounded property registry
//!
//! Properties are appended during initialization and never removed, so a
//! [`PropertyId`] stays valid for the store's whole lifetime. Creation needs
//! `&mut self`; everything else works through `&self` and may run
//! concurrently with the scheduler.

use alloc::string::String;
use heapless::Vec;

use super::{truncate_to, Key, NumericFormat, Property, PropertyId, PropertyKind};
use crate::config::PropertyDefaults;
use crate::constants::{MAX_KEY_LEN, MAX_PROPERTIES};
use crate::errors::{PropertyError, PropertyResult};

/// Fixed-capacity property registry
///
/// ## Invalid handles
///
/// Accessors never fail loudly on an id this store did not issue. They
/// return `false`, an empty key, `0` or `None` instead, as documented on
/// each method.
#[derive(Debug)]
pub struct PropertyStore {
    properties: Vec<Property, MAX_PROPERTIES>,
    defaults: PropertyDefaults,
}

impl PropertyStore {
    /// Empty store using [`PropertyDefaults::default`]
    pub fn new() -> Self {
        Self::with_defaults(PropertyDefaults::default())
    }

    /// Empty store whose properties start with `defaults`
    pub fn with_defaults(defaults: PropertyDefaults) -> Self {
        Self { properties: Vec::new(), defaults }
    }

    /// Change the initial state for properties created from now on
    pub fn set_defaults(&mut self, defaults: PropertyDefaults) {
        self.defaults = defaults;
    }

    /// Initial state applied to new properties
    pub fn defaults(&self) -> PropertyDefaults {
        self.defaults
    }

    /// Number of properties created so far
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// `true` until the first property is created
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Whether `id` names a property of this store
    pub fn contains(&self, id: PropertyId) -> bool {
        id.index() < self.properties.len()
    }

    /// Property behind `id`
    pub fn get(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(id.index())
    }

    /// Look up a property by key
    pub fn find(&self, key: &str) -> Option<PropertyId> {
        self.properties
            .iter()
            .position(|p| p.key() == key)
            .map(PropertyId::from_index)
    }

    /// All properties in creation order
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &Property)> {
        self.properties
            .iter()
            .enumerate()
            .map(|(index, property)| (PropertyId::from_index(index), property))
    }

    /// Create a numeric property.
    ///
    /// `scale == 1` publishes the raw value as an integer (signed or not);
    /// any other scale publishes `value / scale` with `num_decimals` digits.
    ///
    /// # Errors
    ///
    /// `RegistryFull`, `DuplicateKey`, `KeyTooLong`, or `InvalidScale` for a
    /// zero scale.
    pub fn create_numeric(
        &mut self,
        name: &str,
        scale: u16,
        num_decimals: u8,
        signed: bool,
    ) -> PropertyResult<PropertyId> {
        let key = self.check_key(name)?;
        if scale == 0 {
            return Err(PropertyError::InvalidScale);
        }

        let format = NumericFormat { scale, num_decimals, signed };
        let property = Property::new(
            key,
            PropertyKind::Numeric(format),
            self.defaults.value,
            self.defaults.changed,
            String::new(),
        );
        let id = self.insert(property)?;
        log_debug!("created numeric property {} as #{}", name, id.get());
        Ok(id)
    }

    /// Create a string property holding at most `max_len` bytes.
    ///
    /// The buffer (`max_len + 1` bytes) is reserved up front so updates never
    /// allocate.
    ///
    /// # Errors
    ///
    /// `RegistryFull`, `DuplicateKey`, `KeyTooLong`, or `AllocationFailed`.
    pub fn create_string(&mut self, name: &str, max_len: usize) -> PropertyResult<PropertyId> {
        let key = self.check_key(name)?;

        let requested = max_len
            .checked_add(1)
            .ok_or(PropertyError::AllocationFailed { requested: usize::MAX })?;
        let mut text = String::new();
        text.try_reserve_exact(requested)
            .map_err(|_| PropertyError::AllocationFailed { requested })?;

        let property = Property::new(
            key,
            PropertyKind::Text { max_len },
            self.defaults.value,
            self.defaults.changed,
            text,
        );
        let id = self.insert(property)?;
        log_debug!("created string property {} as #{} (max {} bytes)", name, id.get(), max_len);
        Ok(id)
    }

    fn check_key(&self, name: &str) -> PropertyResult<Key> {
        if self.properties.is_full() {
            return Err(PropertyError::RegistryFull { capacity: MAX_PROPERTIES });
        }
        if self.find(name).is_some() {
            return Err(PropertyError::DuplicateKey);
        }
        let mut key = Key::new();
        key.push_str(name)
            .map_err(|_| PropertyError::KeyTooLong { len: name.len(), max: MAX_KEY_LEN })?;
        Ok(key)
    }

    fn insert(&mut self, property: Property) -> PropertyResult<PropertyId> {
        let index = self.properties.len();
        self.properties
            .push(property)
            .map_err(|_| PropertyError::RegistryFull { capacity: MAX_PROPERTIES })?;
        Ok(PropertyId::from_index(index))
    }

    /// Set a numeric value.
    ///
    /// Returns `true` only when the value actually changed, in which case the
    /// property is marked changed. Invalid ids and string properties return
    /// `false`.
    pub fn update_numeric(&self, id: PropertyId, new_value: i32) -> bool {
        let Some(property) = self.numeric(id) else {
            return false;
        };

        let old_value = {
            let mut state = property.lock();
            if state.value == new_value {
                return false;
            }
            let old_value = state.value;
            state.value = new_value;
            state.mark_changed();
            old_value
        };
        log_debug!("property {} changed: {} -> {}", property.key(), old_value, new_value);
        true
    }

    /// Set a string value, truncated to the property's `max_len` bytes.
    ///
    /// Returns `true` only when the stored string changed. Invalid ids and
    /// numeric properties return `false`.
    pub fn update_string(&self, id: PropertyId, new_value: &str) -> bool {
        let Some(property) = self.get(id) else {
            return false;
        };
        let PropertyKind::Text { max_len } = property.kind() else {
            return false;
        };

        let new_value = truncate_to(new_value, max_len);
        {
            let mut state = property.lock();
            if state.text == new_value {
                return false;
            }
            state.text.clear();
            state.text.push_str(new_value);
            state.mark_changed();
        }
        log_debug!("property {} changed: {:?}", property.key(), new_value);
        true
    }

    /// Enable or disable publication of a property in every group
    pub fn set_disabled(&self, id: PropertyId, disabled: bool) -> bool {
        match self.get(id) {
            Some(property) => {
                property.lock().disabled = disabled;
                true
            }
            None => false,
        }
    }

    /// `false` for invalid ids
    pub fn is_disabled(&self, id: PropertyId) -> bool {
        self.get(id).map_or(false, |p| p.lock().disabled)
    }

    /// Pending change not yet acknowledged by a successful publish; `false`
    /// for invalid ids
    pub fn is_changed(&self, id: PropertyId) -> bool {
        self.get(id).map_or(false, Property::is_changed)
    }

    /// Key of the property, empty for invalid ids
    pub fn key(&self, id: PropertyId) -> &str {
        self.get(id).map_or("", Property::key)
    }

    /// Raw numeric value; `None` for invalid ids and string properties
    pub fn value(&self, id: PropertyId) -> Option<i32> {
        self.numeric(id).map(|p| p.lock().value)
    }

    /// Copy up to `max_len` bytes of a string property into `out`.
    ///
    /// `out` is overwritten. Returns `false` for invalid ids and numeric
    /// properties, leaving `out` untouched.
    pub fn string_value(&self, id: PropertyId, out: &mut String, max_len: usize) -> bool {
        let Some(property) = self.get(id).filter(|p| p.kind().is_text()) else {
            return false;
        };
        let state = property.lock();
        out.clear();
        out.push_str(truncate_to(&state.text, max_len));
        true
    }

    /// Scale divisor; `0` for invalid ids, `1` for string properties
    pub fn scale(&self, id: PropertyId) -> u16 {
        self.get(id).map_or(0, |p| p.kind().format().scale)
    }

    /// Published decimal digits; `0` for invalid ids
    pub fn num_decimals(&self, id: PropertyId) -> u8 {
        self.get(id).map_or(0, |p| p.kind().format().num_decimals)
    }

    /// Signed interpretation; `false` for invalid ids and string properties
    pub fn is_signed(&self, id: PropertyId) -> bool {
        self.get(id).map_or(false, |p| p.kind().format().signed)
    }

    fn numeric(&self, id: PropertyId) -> Option<&Property> {
        self.get(id).filter(|p| !p.kind().is_text())
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}
