//! Edit token generation.
//!
//! Tokens are 32 symbols drawn uniformly (with replacement) from a fixed
//! alphabet of letters, digits and punctuation.

use std::borrow::Borrow;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of symbols in every token.
pub const TOKEN_LEN: usize = 32;

/// Symbols a token is drawn from.
pub const ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+{}|:<>?-=[];',./`~";

/// Secret that authorizes edits to a single post.
///
/// `Debug` is redacted so tokens don't end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditToken(String);

impl EditToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for EditToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EditToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EditToken(..)")
    }
}

impl fmt::Display for EditToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Draw a single candidate token.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> EditToken {
    let token = (0..TOKEN_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    EditToken(token)
}

/// Draw candidates until one is not `taken`.
///
/// There is no retry cap; at 32 symbols a collision is practically
/// impossible but still handled.
pub fn generate_unique<R, F>(rng: &mut R, mut taken: F) -> EditToken
where
    R: Rng + ?Sized,
    F: FnMut(&str) -> bool,
{
    loop {
        let candidate = generate(rng);
        if !taken(candidate.as_str()) {
            return candidate;
        }
        tracing::debug!("edit token collision, drawing again");
    }
}
