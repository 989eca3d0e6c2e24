//! Depth-first, post-order walk over a storage tree.

use std::slice;

use super::registry::StorageRegistry;
use super::slot::Slot;

struct Frame<'a> {
    slots: slice::Iter<'a, Slot>,
    /// Slot holding the container this frame walks; yielded when the frame ends.
    holder: Option<&'a Slot>,
}

/// Lazily yields every slot in a storage and in all storages nested in it.
///
/// For each direct slot whose occupant hosts a storage, the nested slots
/// come first, then the slot holding the container. Descent stops at the
/// registry's depth limit.
pub struct SlotTree<'a> {
    registry: &'a StorageRegistry,
    stack: Vec<Frame<'a>>,
    max_depth: usize,
}

impl<'a> SlotTree<'a> {
    pub(crate) fn new(registry: &'a StorageRegistry, root: slice::Iter<'a, Slot>) -> Self {
        Self {
            registry,
            stack: vec![Frame {
                slots: root,
                holder: None,
            }],
            max_depth: registry.max_depth(),
        }
    }

    pub(crate) fn empty(registry: &'a StorageRegistry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
            max_depth: registry.max_depth(),
        }
    }
}

impl<'a> Iterator for SlotTree<'a> {
    type Item = &'a Slot;

    fn next(&mut self) -> Option<&'a Slot> {
        let registry = self.registry;
        loop {
            let frame = self.stack.last_mut()?;
            match frame.slots.next() {
                Some(slot) => {
                    let nested = slot.occupant().and_then(|e| registry.get(e));
                    match nested {
                        Some(storage) if self.stack.len() < self.max_depth => {
                            self.stack.push(Frame {
                                slots: storage.slots(),
                                holder: Some(slot),
                            });
                        }
                        Some(_) => {
                            log::error!(
                                "slot tree deeper than {} at {}, not descending",
                                self.max_depth,
                                slot.slot_ref()
                            );
                            return Some(slot);
                        }
                        None => return Some(slot),
                    }
                }
                None => {
                    let finished = self.stack.pop()?;
                    if let Some(holder) = finished.holder {
                        return Some(holder);
                    }
                }
            }
        }
    }
}
