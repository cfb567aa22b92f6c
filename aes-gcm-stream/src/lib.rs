#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
#![forbid(unsafe_code)]

mod cipher;
mod config;
mod ctr;
mod engine;
mod error;
mod gcm;
mod port;
mod word;

pub use aead::{self, AeadCore, AeadInPlace, Key, KeyInit, KeySizeUser, Nonce, Tag};
pub use aes;
pub use gf128;

pub use crate::{
    cipher::{AesCipher, EncryptBlock},
    config::{Config, Direction, KeySize, WordWidth, Words},
    ctr::{FAST_IV_SIZE, Keystream, derive_j0},
    engine::{Engine, OUTPUT_DEPTH, Phase},
    error::{Error, Result},
    gcm::{Aes128Gcm, Aes192Gcm, Aes256Gcm, AesGcm},
    word::Word,
};

/// Maximum length of associated data in bytes.
pub const A_MAX: u64 = 1 << 36;

/// Maximum length of plaintext in bytes.
pub const P_MAX: u64 = 1 << 36;

/// Maximum length of ciphertext in bytes, including the tag.
pub const C_MAX: u64 = (1 << 36) + 16;
