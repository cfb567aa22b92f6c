#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]

mod field_element;
mod ghash;

pub use universal_hash;

pub use crate::{
    field_element::{FieldElement, digit_serial::Multiplier},
    ghash::GHash,
};

use universal_hash::{consts::U16, generic_array::GenericArray};

/// Size of a GHASH block in bytes
pub const BLOCK_SIZE: usize = 16;

/// Size of a GHASH key (the hash subkey `H`) in bytes
pub const KEY_SIZE: usize = 16;

/// GHASH keys (16-bytes)
pub type Key = GenericArray<u8, U16>;

/// GHASH blocks (16-bytes)
pub type Block = GenericArray<u8, U16>;

/// GHASH tags (16-bytes)
pub type Tag = GenericArray<u8, U16>;
