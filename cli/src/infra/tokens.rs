//! Infrastructure implementation of the `TokenGenerator` port.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

use crate::application::ports::TokenGenerator;
use crate::domain::token::format_token;

/// Random 128-bit tokens from the nanosecond clock and independently seeded
/// `RandomState` hashers.
pub struct RandomTokenGenerator;

fn random_u64(salt: u128) -> u64 {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(salt);
    hasher.write_u64(RandomState::new().build_hasher().finish());
    hasher.finish()
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&random_u64(nanos).to_be_bytes());
        bytes[8..].copy_from_slice(&random_u64(nanos.rotate_left(64)).to_be_bytes());
        format_token(bytes)
    }
}
