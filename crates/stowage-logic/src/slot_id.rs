//! Slot identifiers.
//!
//! A slot is addressed within its storage either by a named role
//! ("left hand", "back") or by a positional index (the third pocket of a
//! backpack). The two forms never mix: [`SlotIdentifier`] is an enum, so a
//! value carries exactly one of them.
//!
//! ```
//! use stowage_logic::slot_id::{NamedSlot, SlotIdentifier};
//!
//! let hand = SlotIdentifier::named(NamedSlot::LeftHand);
//! let pocket = SlotIdentifier::indexed(2);
//! assert_ne!(hand, pocket);
//! assert_eq!(pocket.index(), Some(2));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body and equipment roles a storage may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NamedSlot {
    Head,
    Eyes,
    Ears,
    Mask,
    Neck,
    Uniform,
    OuterClothing,
    SuitStorage,
    Belt,
    Back,
    Id,
    Hands,
    Feet,
    LeftHand,
    RightHand,
    LeftPocket,
    RightPocket,
    Handcuffs,
}

impl NamedSlot {
    /// Every role, in declaration order.
    pub const ALL: [NamedSlot; 18] = [
        NamedSlot::Head,
        NamedSlot::Eyes,
        NamedSlot::Ears,
        NamedSlot::Mask,
        NamedSlot::Neck,
        NamedSlot::Uniform,
        NamedSlot::OuterClothing,
        NamedSlot::SuitStorage,
        NamedSlot::Belt,
        NamedSlot::Back,
        NamedSlot::Id,
        NamedSlot::Hands,
        NamedSlot::Feet,
        NamedSlot::LeftHand,
        NamedSlot::RightHand,
        NamedSlot::LeftPocket,
        NamedSlot::RightPocket,
        NamedSlot::Handcuffs,
    ];

    /// Human-readable label used in logs and UI.
    pub fn label(self) -> &'static str {
        match self {
            NamedSlot::Head => "head",
            NamedSlot::Eyes => "eyes",
            NamedSlot::Ears => "ears",
            NamedSlot::Mask => "mask",
            NamedSlot::Neck => "neck",
            NamedSlot::Uniform => "uniform",
            NamedSlot::OuterClothing => "outer clothing",
            NamedSlot::SuitStorage => "suit storage",
            NamedSlot::Belt => "belt",
            NamedSlot::Back => "back",
            NamedSlot::Id => "id",
            NamedSlot::Hands => "hands",
            NamedSlot::Feet => "feet",
            NamedSlot::LeftHand => "left hand",
            NamedSlot::RightHand => "right hand",
            NamedSlot::LeftPocket => "left pocket",
            NamedSlot::RightPocket => "right pocket",
            NamedSlot::Handcuffs => "handcuffs",
        }
    }

    /// Whether this role is one of the two hands.
    pub fn is_hand(self) -> bool {
        matches!(self, NamedSlot::LeftHand | NamedSlot::RightHand)
    }
}

/// Identifies one slot within its owning storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotIdentifier {
    Named(NamedSlot),
    Indexed(u32),
}

impl SlotIdentifier {
    pub fn named(slot: NamedSlot) -> Self {
        Self::Named(slot)
    }

    pub fn indexed(index: u32) -> Self {
        Self::Indexed(index)
    }

    pub fn named_slot(&self) -> Option<NamedSlot> {
        match self {
            Self::Named(slot) => Some(*slot),
            Self::Indexed(_) => None,
        }
    }

    pub fn index(&self) -> Option<u32> {
        match self {
            Self::Named(_) => None,
            Self::Indexed(index) => Some(*index),
        }
    }
}

impl From<NamedSlot> for SlotIdentifier {
    fn from(slot: NamedSlot) -> Self {
        Self::Named(slot)
    }
}

impl fmt::Display for SlotIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(slot) => write!(f, "{}", slot.label()),
            Self::Indexed(index) => write!(f, "#{}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn named_and_indexed_are_distinct() {
        let a = SlotIdentifier::named(NamedSlot::Back);
        let b = SlotIdentifier::indexed(0);
        assert_ne!(a, b);
        assert_eq!(a.named_slot(), Some(NamedSlot::Back));
        assert_eq!(a.index(), None);
        assert_eq!(b.named_slot(), None);
        assert_eq!(b.index(), Some(0));
    }

    #[test]
    fn structural_hashing() {
        let mut set = HashSet::new();
        set.insert(SlotIdentifier::indexed(3));
        set.insert(SlotIdentifier::indexed(3));
        set.insert(NamedSlot::Belt.into());
        set.insert(SlotIdentifier::named(NamedSlot::Belt));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_labels() {
        assert_eq!(SlotIdentifier::named(NamedSlot::LeftHand).to_string(), "left hand");
        assert_eq!(SlotIdentifier::indexed(4).to_string(), "#4");
    }

    #[test]
    fn all_roles_unique() {
        let set: HashSet<_> = NamedSlot::ALL.iter().collect();
        assert_eq!(set.len(), NamedSlot::ALL.len());
        assert!(NamedSlot::LeftHand.is_hand());
        assert!(!NamedSlot::Back.is_hand());
    }
}
