//! Streaming controller.
//!
//! The engine walks one session through its phases in a fixed order:
//!
//! ```text
//! Idle -> LoadKey -> LoadIv -> StreamAad -> StreamText -> EmitTag | VerifyTag -> Done
//! ```
//!
//! Four ports move data in and out, each with its own readiness:
//!
//! | port        | direction | call                     | readiness                   |
//! |-------------|-----------|--------------------------|-----------------------------|
//! | key/IV      | in        | [`Engine::push_key_iv`]  | [`Engine::key_iv_ready`]    |
//! | AAD/text    | in        | [`Engine::push_data`]    | [`Engine::data_ready`]      |
//! | text        | out       | [`Engine::pull_text`]    | returns `None` when empty   |
//! | tag         | out       | [`Engine::pull_tag`]     | returns `None` when empty   |
//!
//! A word is transferred exactly when the push returns `Ok` or the pull returns `Some`. A
//! rejected push leaves the engine untouched, so the caller simply retries the same word later.

mod buffer;

use self::buffer::BlockBuffer;
use crate::{
    A_MAX, AesCipher, Config, Direction, Error, P_MAX, Result, Word,
    ctr::{FAST_IV_SIZE, Keystream, length_block},
    port::{Fifo, TagPort},
};
use core::fmt;
use gf128::{BLOCK_SIZE, Block, GHash, universal_hash::Reset};
use subtle::ConstantTimeEq;
use tracing::{debug, trace};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Number of words the text output port holds before the data port applies backpressure.
pub const OUTPUT_DEPTH: usize = 2;

/// Largest supported key (AES-256) in bytes.
const MAX_KEY_SIZE: usize = 32;

/// Session phase.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Phase {
    /// No session in progress.
    Idle,

    /// Receiving key material on the key/IV port.
    LoadKey,

    /// Receiving the IV on the key/IV port.
    LoadIv,

    /// Receiving associated data on the data port.
    StreamAad,

    /// Receiving plaintext (encrypt) or ciphertext (decrypt) on the data port.
    StreamText,

    /// Emitting the tag on the tag port (encrypt).
    EmitTag,

    /// Receiving the expected tag on the data port (decrypt).
    VerifyTag,

    /// Session complete; [`Engine::verified`] holds the result of a decrypt session.
    Done,
}

/// Per-key state: expanded key and the GHASH accumulator keyed with `H`.
struct Keyed<const D: usize> {
    cipher: AesCipher,
    ghash: GHash<D>,
}

/// Streaming AES-GCM engine.
///
/// `D` is the digit width of the GHASH multiplier (see [`gf128::Multiplier`]); it changes how
/// much work each multiply does per step, never the output.
///
/// # Framing
///
/// Every field is a sequence of words. All words but the last are exactly the configured
/// [`WordWidth`](crate::WordWidth) long; the last may be shorter (or empty) and carries the last
/// marker. [`WordWidth::split`](crate::WordWidth::split) produces such a sequence.
///
/// - Key/IV port: the key (exactly the configured key size, last marker on the word that
///   completes it), then the IV (any non-zero length).
/// - Data port: the AAD, then the text, then for decryption the 16 byte tag.
/// - Text port: one output word per text input word, same length, same last marker.
/// - Tag port (encryption): the 16 byte tag.
///
/// An empty AAD or text field is a single empty last word.
///
/// # Plaintext release on decryption
///
/// **Decrypted plaintext is released on the text port as soon as each word is processed, before
/// the tag has been checked.** The engine cannot take it back when verification fails. Callers
/// must hold released plaintext until [`Engine::verified`] returns `Some(true)` and must discard
/// it on `Some(false)`. Use [`AesGcm`](crate::AesGcm) when the whole message fits in memory and
/// plaintext must never be exposed on failure.
pub struct Engine<const D: usize = 128> {
    config: Config,
    phase: Phase,
    keyed: Option<Keyed<D>>,

    /// Key register, filled word by word during `LoadKey`
    key: [u8; MAX_KEY_SIZE],
    key_len: usize,

    /// IV bytes received so far
    iv_len: u64,

    /// Partial IV, AAD, text or tag block
    block: BlockBuffer,

    keystream: Keystream,
    keystream_block: Block,
    tag_mask: Block,
    expected_tag: Block,

    aad_len: u64,
    text_len: u64,

    output: Fifo<Word, OUTPUT_DEPTH>,
    tag: TagPort,
    verified: Option<bool>,
}

impl<const D: usize> Engine<D> {
    /// Create an idle engine with no key loaded.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            keyed: None,
            key: [0; MAX_KEY_SIZE],
            key_len: 0,
            iv_len: 0,
            block: BlockBuffer::default(),
            keystream: Keystream::new(Block::default()),
            keystream_block: Block::default(),
            tag_mask: Block::default(),
            expected_tag: Block::default(),
            aad_len: 0,
            text_len: 0,
            output: Fifo::new(),
            tag: TagPort::default(),
            verified: None,
        }
    }

    /// Configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a key is loaded and can be reused with [`Engine::reuse_key`].
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.keyed.is_some()
    }

    /// AAD bytes accepted in the current session.
    #[must_use]
    pub fn aad_len(&self) -> u64 {
        self.aad_len
    }

    /// Text bytes accepted in the current session.
    #[must_use]
    pub fn text_len(&self) -> u64 {
        self.text_len
    }

    /// Whether [`Engine::push_key_iv`] will accept a word.
    ///
    /// A new session cannot start until the text port from the previous one has been drained.
    #[must_use]
    pub fn key_iv_ready(&self) -> bool {
        match self.phase {
            Phase::Idle | Phase::Done => self.output.is_empty(),
            Phase::LoadKey | Phase::LoadIv => true,
            _ => false,
        }
    }

    /// Whether [`Engine::push_data`] will accept a word.
    #[must_use]
    pub fn data_ready(&self) -> bool {
        match self.phase {
            Phase::StreamAad | Phase::VerifyTag => true,
            Phase::StreamText => !self.output.is_full(),
            _ => false,
        }
    }

    /// Present one key or IV word.
    ///
    /// In `Idle` or `Done` this starts a new session with a new key; the previous key is
    /// discarded.
    ///
    /// # Errors
    ///
    /// - [`Error::UnexpectedPhase`] outside `Idle`, `Done`, `LoadKey` and `LoadIv`.
    /// - [`Error::NotReady`] when starting a session while the text port still holds words.
    /// - [`Error::WordTooLong`] / [`Error::ShortWord`] for malformed words.
    /// - [`Error::InvalidKeyLength`] when the key words overrun the key size, or the last
    ///   marker does not fall on the word that completes it.
    /// - [`Error::EmptyIv`] for an IV with no bytes.
    pub fn push_key_iv(&mut self, word: Word) -> Result<()> {
        match self.phase {
            Phase::Idle | Phase::Done => {
                if !self.output.is_empty() {
                    return Err(Error::NotReady);
                }
                self.check_key_word(0, &word)?;
                self.begin(Phase::LoadKey);
                self.absorb_key(&word)
            }
            Phase::LoadKey => {
                self.check_key_word(self.key_len, &word)?;
                self.absorb_key(&word)
            }
            Phase::LoadIv => {
                self.config.word_width().check(&word)?;
                if word.is_last() && word.is_empty() && self.iv_len == 0 {
                    return Err(Error::EmptyIv);
                }
                self.absorb_iv(&word)
            }
            phase => Err(Error::UnexpectedPhase(phase)),
        }
    }

    /// Start a new session with the key from the previous one; only an IV is loaded next.
    ///
    /// # Errors
    ///
    /// - [`Error::UnexpectedPhase`] outside `Idle` and `Done`.
    /// - [`Error::NoKey`] if no key has been loaded since construction or the last reset.
    /// - [`Error::NotReady`] while the text port still holds words.
    pub fn reuse_key(&mut self) -> Result<()> {
        match self.phase {
            Phase::Idle | Phase::Done => {}
            phase => return Err(Error::UnexpectedPhase(phase)),
        }

        if self.keyed.is_none() {
            return Err(Error::NoKey);
        }

        if !self.output.is_empty() {
            return Err(Error::NotReady);
        }

        trace!("reusing loaded key");
        self.begin(Phase::LoadIv);
        Ok(())
    }

    /// Present one AAD, text or (decryption) tag word.
    ///
    /// # Errors
    ///
    /// - [`Error::UnexpectedPhase`] outside `StreamAad`, `StreamText` and `VerifyTag`.
    /// - [`Error::NotReady`] in `StreamText` while the text port is full.
    /// - [`Error::WordTooLong`] / [`Error::ShortWord`] for malformed words.
    /// - [`Error::AadTooLong`] / [`Error::TextTooLong`] past [`A_MAX`] / [`P_MAX`].
    /// - [`Error::InvalidTagLength`] unless the tag is exactly 16 bytes with the last marker
    ///   on the word that completes it.
    pub fn push_data(&mut self, word: Word) -> Result<()> {
        match self.phase {
            Phase::StreamAad | Phase::StreamText | Phase::VerifyTag => {}
            phase => return Err(Error::UnexpectedPhase(phase)),
        }

        self.config.word_width().check(&word)?;

        match self.phase {
            Phase::StreamAad => self.absorb_aad(&word),
            Phase::StreamText => self.absorb_text(word),
            _ => self.absorb_tag(&word),
        }
    }

    /// Take the next word from the text output port.
    pub fn pull_text(&mut self) -> Option<Word> {
        self.output.try_pull()
    }

    /// Take the next word from the tag output port (encryption only).
    pub fn pull_tag(&mut self) -> Option<Word> {
        if self.phase != Phase::EmitTag {
            return None;
        }

        let word = self.tag.next_word(self.config.word_width())?;
        if word.is_last() {
            self.tag.clear();
            self.advance(Phase::Done);
        }
        Some(word)
    }

    /// Outcome of tag verification.
    ///
    /// `Some(true)` or `Some(false)` once a decrypt session reaches `Done`, `None` otherwise.
    /// Nothing about where a mismatching tag differs is exposed.
    #[must_use]
    pub fn verified(&self) -> Option<bool> {
        self.verified
    }

    /// Abort any session and return to `Idle`.
    ///
    /// Discards the key, `H`, IV, counters, partial blocks and queued output. The next session
    /// must load a key.
    pub fn reset(&mut self) {
        debug!(from = ?self.phase, "session reset");
        self.clear_session();
        self.keyed = None;
        self.output.clear();
        self.phase = Phase::Idle;
    }

    fn advance(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }

    fn begin(&mut self, next: Phase) {
        if self.phase == Phase::Done {
            self.advance(Phase::Idle);
        }

        self.clear_session();
        if next == Phase::LoadIv {
            if let Some(keyed) = self.keyed.as_mut() {
                keyed.ghash.reset();
            }
        } else {
            self.keyed = None;
        }
        self.advance(next);
    }

    fn clear_session(&mut self) {
        self.wipe_key_register();
        self.iv_len = 0;
        self.block.clear();
        self.keystream.reset(Block::default());
        self.keystream_block = Block::default();
        self.tag_mask = Block::default();
        self.expected_tag = Block::default();
        self.aad_len = 0;
        self.text_len = 0;
        self.tag.clear();
        self.verified = None;
    }

    fn wipe_key_register(&mut self) {
        #[cfg(feature = "zeroize")]
        self.key.zeroize();
        #[cfg(not(feature = "zeroize"))]
        self.key.fill(0);
        self.key_len = 0;
    }

    fn check_key_word(&self, have: usize, word: &Word) -> Result<()> {
        self.config.word_width().check(word)?;

        let expected = self.config.key_size().bytes();
        let total = have + word.len();
        if total > expected || word.is_last() != (total == expected) {
            return Err(Error::InvalidKeyLength { expected });
        }

        Ok(())
    }

    fn absorb_key(&mut self, word: &Word) -> Result<()> {
        let end = self.key_len + word.len();
        self.key[self.key_len..end].copy_from_slice(word.as_bytes());
        self.key_len = end;

        if word.is_last() {
            let cipher = AesCipher::new(self.config.key_size(), &self.key[..end])?;
            self.wipe_key_register();

            let ghash = GHash::new(&cipher.hash_subkey());
            self.keyed = Some(Keyed { cipher, ghash });
            self.advance(Phase::LoadIv);
        }

        Ok(())
    }

    fn absorb_iv(&mut self, word: &Word) -> Result<()> {
        let keyed = self.keyed.as_mut().ok_or(Error::NoKey)?;

        self.iv_len += word.len() as u64;
        if let Some(block) = self.block.extend(word.as_bytes()) {
            keyed.ghash.fold(&block);
        }

        if !word.is_last() {
            return Ok(());
        }

        let j0 = if self.iv_len == FAST_IV_SIZE as u64 {
            let mut j0 = self.block.take_padded();
            j0[BLOCK_SIZE - 1] = 1;
            j0
        } else {
            if !self.block.is_empty() {
                keyed.ghash.fold(&self.block.take_padded());
            }
            keyed.ghash.fold(&length_block(0, self.iv_len));
            let j0 = keyed.ghash.value();
            keyed.ghash.reset();
            j0
        };

        self.keystream.reset(j0);
        self.tag_mask = self.keystream.tag_mask(&keyed.cipher);
        self.advance(Phase::StreamAad);
        Ok(())
    }

    fn absorb_aad(&mut self, word: &Word) -> Result<()> {
        let aad_len = self.aad_len + word.len() as u64;
        if aad_len > A_MAX {
            return Err(Error::AadTooLong);
        }

        let keyed = self.keyed.as_mut().ok_or(Error::NoKey)?;
        self.aad_len = aad_len;

        if let Some(block) = self.block.extend(word.as_bytes()) {
            keyed.ghash.fold(&block);
        }

        if word.is_last() {
            if !self.block.is_empty() {
                keyed.ghash.fold(&self.block.take_padded());
            }
            self.advance(Phase::StreamText);
        }

        Ok(())
    }

    fn absorb_text(&mut self, word: Word) -> Result<()> {
        if self.output.is_full() {
            return Err(Error::NotReady);
        }

        let text_len = self.text_len + word.len() as u64;
        if text_len > P_MAX {
            return Err(Error::TextTooLong);
        }

        let keyed = self.keyed.as_mut().ok_or(Error::NoKey)?;
        self.text_len = text_len;

        let offset = self.block.len();
        if offset == 0 && !word.is_empty() {
            self.keystream_block = self.keystream.next_block(&keyed.cipher);
        }

        let mut out = word;
        for (byte, k) in out
            .as_bytes_mut()
            .iter_mut()
            .zip(&self.keystream_block[offset..])
        {
            *byte ^= k;
        }

        // GHASH always covers the ciphertext side
        let ciphertext = match self.config.direction() {
            Direction::Encrypt => &out,
            Direction::Decrypt => &word,
        };
        if let Some(block) = self.block.extend(ciphertext.as_bytes()) {
            keyed.ghash.fold(&block);
        }

        let queued = self.output.try_push(out);
        debug_assert!(queued.is_ok());

        if !word.is_last() {
            return Ok(());
        }

        if !self.block.is_empty() {
            keyed.ghash.fold(&self.block.take_padded());
        }
        keyed
            .ghash
            .fold(&length_block(self.aad_len, self.text_len));

        let mut tag = keyed.ghash.value();
        for (t, m) in tag.iter_mut().zip(self.tag_mask.iter()) {
            *t ^= m;
        }

        match self.config.direction() {
            Direction::Encrypt => {
                self.tag.load(tag);
                self.advance(Phase::EmitTag);
            }
            Direction::Decrypt => {
                self.expected_tag = tag;
                self.advance(Phase::VerifyTag);
            }
        }

        Ok(())
    }

    fn absorb_tag(&mut self, word: &Word) -> Result<()> {
        let len = self.block.len() + word.len();
        if len > BLOCK_SIZE || word.is_last() != (len == BLOCK_SIZE) {
            return Err(Error::InvalidTagLength);
        }

        if let Some(received) = self.block.extend(word.as_bytes()) {
            let matched = bool::from(received.as_slice().ct_eq(self.expected_tag.as_slice()));
            if !matched {
                debug!(
                    aad_len = self.aad_len,
                    text_len = self.text_len,
                    "tag verification failed"
                );
            }

            self.expected_tag = Block::default();
            self.verified = Some(matched);
            self.advance(Phase::Done);
        }

        Ok(())
    }
}

impl<const D: usize> fmt::Debug for Engine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("digit_width", &D)
            .field("phase", &self.phase)
            .field("has_key", &self.keyed.is_some())
            .field("aad_len", &self.aad_len)
            .field("text_len", &self.text_len)
            .field("queued", &self.output.len())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl<const D: usize> Drop for Engine<D> {
    fn drop(&mut self) {
        self.key.zeroize();
        self.block.zeroize();
        self.keystream_block.as_mut_slice().zeroize();
        self.tag_mask.as_mut_slice().zeroize();
        self.expected_tag.as_mut_slice().zeroize();
        self.output.zeroize();
        self.tag.zeroize();
    }
}
