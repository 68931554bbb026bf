//! Channel sets
//!
//! A channel set is the list of B-channels offered for, or selected by, a
//! call. It holds at most [`MAX_CHANNELS`] distinct handles in insertion
//! order and never allocates.

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

/// Capacity of a channel set (30 B-channels on E1 plus headroom)
pub const MAX_CHANNELS: usize = 32;

/// Identifies one bearer channel of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelHandle(pub u16);

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// Channel set errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelSetError {
    #[error("Channel set full ({capacity} channels)")]
    CapacityExceeded { capacity: usize },

    #[error("Channel {0} not in set")]
    NotFound(ChannelHandle),
}

/// Fixed-capacity set of channel handles without duplicates.
///
/// `PartialEq` compares element by element, so two sets holding the same
/// channels in a different order are not equal. Use
/// [`ChannelSet::same_channels`] for an order-independent comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSet {
    chans: ArrayVec<ChannelHandle, MAX_CHANNELS>,
}

impl ChannelSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of channels in the set
    pub fn len(&self) -> usize {
        self.chans.len()
    }

    /// Returns true if the set holds no channel
    pub fn is_empty(&self) -> bool {
        self.chans.is_empty()
    }

    /// Returns true if no further channel can be added
    pub fn is_full(&self) -> bool {
        self.chans.is_full()
    }

    /// Returns true if `chan` is in the set
    pub fn contains(&self, chan: ChannelHandle) -> bool {
        self.chans.contains(&chan)
    }

    /// Channels in insertion order
    pub fn iter(&self) -> impl Iterator<Item = ChannelHandle> + '_ {
        self.chans.iter().copied()
    }

    /// First channel of the set (the preferred one when offered)
    pub fn first(&self) -> Option<ChannelHandle> {
        self.chans.first().copied()
    }

    /// Channels as a slice, in insertion order
    pub fn as_slice(&self) -> &[ChannelHandle] {
        &self.chans
    }

    /// Remove every channel
    pub fn clear(&mut self) {
        self.chans.clear();
    }

    /// Add a channel. Adding a channel already present is a no-op.
    pub fn add(&mut self, chan: ChannelHandle) -> Result<(), ChannelSetError> {
        if self.contains(chan) {
            return Ok(());
        }
        self.chans
            .try_push(chan)
            .map_err(|_| ChannelSetError::CapacityExceeded {
                capacity: MAX_CHANNELS,
            })
    }

    /// Remove a channel, closing the gap it leaves.
    pub fn remove(&mut self, chan: ChannelHandle) -> Result<(), ChannelSetError> {
        let idx = self
            .chans
            .iter()
            .position(|&c| c == chan)
            .ok_or(ChannelSetError::NotFound(chan))?;
        self.chans.remove(idx);
        Ok(())
    }

    /// Add every channel of `other` not already present.
    ///
    /// Fails without modifying `self` if the union does not fit.
    pub fn merge(&mut self, other: &ChannelSet) -> Result<(), ChannelSetError> {
        let missing = other.iter().filter(|&c| !self.contains(c)).count();
        if self.len() + missing > MAX_CHANNELS {
            return Err(ChannelSetError::CapacityExceeded {
                capacity: MAX_CHANNELS,
            });
        }
        for chan in other.iter() {
            self.add(chan)?;
        }
        Ok(())
    }

    /// Keep only the channels also present in `other`.
    pub fn intersect(&mut self, other: &ChannelSet) {
        self.chans.retain(|c| other.contains(*c));
    }

    /// Remove every channel present in `other`.
    pub fn subtract(&mut self, other: &ChannelSet) {
        self.chans.retain(|c| !other.contains(*c));
    }

    /// Order-independent comparison
    pub fn same_channels(&self, other: &ChannelSet) -> bool {
        self.len() == other.len() && self.iter().all(|c| other.contains(c))
    }
}

impl TryFrom<&[ChannelHandle]> for ChannelSet {
    type Error = ChannelSetError;

    fn try_from(chans: &[ChannelHandle]) -> Result<Self, Self::Error> {
        let mut set = ChannelSet::new();
        for &chan in chans {
            set.add(chan)?;
        }
        Ok(set)
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, chan) in self.chans.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", chan.0)?;
        }
        f.write_str("}")
    }
}
