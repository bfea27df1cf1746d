//! Bind groups: keys whose arrays are expanded in lock-step.

use std::{borrow::Cow, str::FromStr};

use crate::{
    error::{Result, SpanError},
    key::{Key, parse_key_set},
};

/// A set of keys that share one index at every expansion step.
///
/// Parsed from a comma separated list, e.g. `width,height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGroup(Vec<Key>);

impl KeyGroup {
    pub fn keys(&self) -> &[Key] {
        &self.0
    }
}

impl FromStr for KeyGroup {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(parse_key_set(s)?))
    }
}

/// All declared bind groups. A key may belong to at most one group.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    groups: Vec<Vec<Key>>,
}

impl Bindings {
    /// Build the binding set, rejecting keys bound twice.
    pub fn new(groups: impl IntoIterator<Item = KeyGroup>) -> Result<Self> {
        let mut bindings = Self::default();
        for group in groups {
            bindings.bind(group)?;
        }
        Ok(bindings)
    }

    /// Add a group. Fails if any of its keys is already bound, in this group
    /// or in a previous one.
    pub fn bind(&mut self, KeyGroup(keys): KeyGroup) -> Result<()> {
        for (i, key) in keys.iter().enumerate() {
            let repeated = keys[..i].contains(key);
            if repeated || self.groups.iter().any(|group| group.contains(key)) {
                return Err(SpanError::DuplicateBinding(key.clone()));
            }
        }
        self.groups.push(keys);
        Ok(())
    }

    /// The group containing `key`, or a singleton group if it is unbound.
    pub fn find<'a>(&'a self, key: &Key) -> Cow<'a, [Key]> {
        self.groups
            .iter()
            .find(|group| group.contains(key))
            .map(|group| Cow::Borrowed(group.as_slice()))
            .unwrap_or_else(|| Cow::Owned(vec![key.clone()]))
    }
}

/// Reduce an expand set so that each bind group is driven by one key.
///
/// For every key, later occurrences of the other members of its group are
/// removed by swapping them with the last entry and truncating. The first
/// member to appear becomes the group's driver.
pub fn reduce_to_representatives(mut expand: Vec<Key>, bindings: &Bindings) -> Vec<Key> {
    let mut i = 0;
    while i < expand.len() {
        let driver = expand[i].clone();
        let group = bindings.find(&driver);
        for member in group.iter().filter(|k| **k != driver) {
            if let Some(j) = expand[i + 1..].iter().position(|k| k == member) {
                expand.swap_remove(i + 1 + j);
            }
        }
        i += 1;
    }
    expand
}
