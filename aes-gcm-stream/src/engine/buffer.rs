//! Block assembly for the hashed fields.

use gf128::{BLOCK_SIZE, Block};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Collects port words into 128-bit blocks.
///
/// Full words are a power of two no wider than a block, so a word never straddles two blocks.
#[derive(Clone, Default)]
pub(super) struct BlockBuffer {
    bytes: Block,
    len: usize,
}

impl BlockBuffer {
    /// Bytes collected towards the current block.
    pub(super) fn len(&self) -> usize {
        self.len
    }

    pub(super) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `data`, returning the block if it is now complete.
    pub(super) fn extend(&mut self, data: &[u8]) -> Option<Block> {
        let end = self.len + data.len();
        self.bytes[self.len..end].copy_from_slice(data);
        self.len = end;

        (end == BLOCK_SIZE).then(|| self.take_padded())
    }

    /// Current contents zero-padded to a full block; the buffer is left empty.
    pub(super) fn take_padded(&mut self) -> Block {
        let mut block = Block::default();
        block[..self.len].copy_from_slice(&self.bytes[..self.len]);
        self.clear();
        block
    }

    pub(super) fn clear(&mut self) {
        self.bytes = Block::default();
        self.len = 0;
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for BlockBuffer {
    fn zeroize(&mut self) {
        self.bytes.as_mut_slice().zeroize();
        self.len = 0;
    }
}
