//! Bounded queues behind the engine's output ports.

use crate::{Word, WordWidth};
use gf128::{BLOCK_SIZE, Tag};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Fixed-capacity FIFO.
///
/// `try_push` on a full queue hands the item back instead of overwriting, so nothing is dropped;
/// `try_pull` hands each item out exactly once, in order.
#[derive(Clone, Debug)]
pub(crate) struct Fifo<T: Copy + Default, const N: usize> {
    slots: [T; N],
    head: usize,
    len: usize,
}

impl<T: Copy + Default, const N: usize> Fifo<T, N> {
    pub(crate) fn new() -> Self {
        Self {
            slots: [T::default(); N],
            head: 0,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == N
    }

    pub(crate) fn try_push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }

        self.slots[(self.head + self.len) % N] = item;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn try_pull(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = core::mem::take(&mut self.slots[self.head]);
        self.head = (self.head + 1) % N;
        self.len -= 1;
        Some(item)
    }

    /// Drop everything queued and overwrite the slots.
    pub(crate) fn clear(&mut self) {
        self.slots = [T::default(); N];
        self.head = 0;
        self.len = 0;
    }
}

/// Tag output port: hands out a computed tag one word at a time.
#[derive(Clone, Debug, Default)]
pub(crate) struct TagPort {
    tag: Tag,
    sent: usize,
    loaded: bool,
}

impl TagPort {
    pub(crate) fn load(&mut self, tag: Tag) {
        self.tag = tag;
        self.sent = 0;
        self.loaded = true;
    }

    pub(crate) fn next_word(&mut self, width: WordWidth) -> Option<Word> {
        if !self.loaded || self.sent >= BLOCK_SIZE {
            return None;
        }

        let end = self.sent + width.get();
        let word = Word::from_parts(&self.tag[self.sent..end], end == BLOCK_SIZE);
        self.sent = end;
        Some(word)
    }

    pub(crate) fn clear(&mut self) {
        self.tag = Tag::default();
        self.sent = 0;
        self.loaded = false;
    }
}

#[cfg(feature = "zeroize")]
impl<T: Copy + Default + Zeroize, const N: usize> Zeroize for Fifo<T, N> {
    fn zeroize(&mut self) {
        for slot in &mut self.slots {
            slot.zeroize();
        }
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for TagPort {
    fn zeroize(&mut self) {
        self.tag.as_mut_slice().zeroize();
        self.sent = 0;
        self.loaded = false;
    }
}
