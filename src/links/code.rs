//! Short Code Module
//!
//! Random short code generation.

use std::iter;

/// Symbols a short code is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 8;

/// Produces candidate short codes.
///
/// Implementations make no uniqueness promise; the engine checks every
/// candidate against the store.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

// == Random Code Generator ==
/// Draws `length` symbols uniformly from [`CODE_ALPHABET`].
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
            .take(self.length)
            .collect()
    }
}

/// Checks whether `code` has the shape of a short code: non-empty ASCII
/// alphanumerics only.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
