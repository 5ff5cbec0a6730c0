//! Provably-fair randomness: commit a server seed before bets close, draw an
//! unbiased shuffle from an HMAC-SHA256 keystream, reveal the seed after
//! settlement so a client can recompute and verify the same permutation.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// 32 bytes of cryptographic randomness, hex-encoded.
pub fn generate_server_seed() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// `SHA-256(seed)`, hex-encoded — published before bets close.
pub fn commit(seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// True iff `commit(seed) == commitment`.
pub fn verify(seed: &str, commitment: &str) -> bool {
    commit(seed) == commitment
}

/// A keystream of unbiased `u32`s drawn from repeated HMAC-SHA256 blocks,
/// keyed by `server_seed` and messaged with `"{client_seed}:{nonce}:{round}"`.
struct Keystream<'a> {
    server_seed: &'a str,
    client_seed: &'a str,
    nonce: u64,
    round: u64,
    buffer: Vec<u32>,
}

impl<'a> Keystream<'a> {
    fn new(server_seed: &'a str, client_seed: &'a str, nonce: u64) -> Self {
        Keystream {
            server_seed,
            client_seed,
            nonce,
            round: 0,
            buffer: Vec::new(),
        }
    }

    fn refill(&mut self) {
        let message = format!("{}:{}:{}", self.client_seed, self.nonce, self.round);
        self.round += 1;
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());
        let block = mac.finalize().into_bytes();
        self.buffer = block
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .rev()
            .collect();
    }

    fn next_u32(&mut self) -> u32 {
        if self.buffer.is_empty() {
            self.refill();
        }
        self.buffer.pop().expect("refilled buffer is non-empty")
    }

    /// Draw an index in `[0, m)` with no modulo bias, rejecting values in
    /// the tail that would skew the distribution.
    fn index(&mut self, m: u32) -> u32 {
        let limit = (u32::MAX / m) * m;
        loop {
            let v = self.next_u32();
            if v < limit {
                return v % m;
            }
        }
    }
}

/// Deterministic Fisher-Yates shuffle of the 52-card deck, high index to
/// low, driven by the `(server_seed, client_seed, nonce)` keystream.
/// Identical inputs always produce the identical permutation.
pub fn shuffle(server_seed: &str, client_seed: &str, nonce: u64) -> Vec<u8> {
    let mut deck: Vec<u8> = (0..52u8).collect();
    let mut stream = Keystream::new(server_seed, client_seed, nonce);
    for i in (1..deck.len()).rev() {
        let j = stream.index((i + 1) as u32) as usize;
        deck.swap(i, j);
    }
    deck
}

/// Draws a single unbiased value in `[0, m)` from the same
/// `(server_seed, client_seed, nonce)` keystream `shuffle` uses, via
/// rejection sampling (`Keystream::index`). Used where the draw itself
/// is the result, rather than a deck permutation (e.g. roulette).
pub fn draw_index(server_seed: &str, client_seed: &str, nonce: u64, m: u32) -> u32 {
    let mut stream = Keystream::new(server_seed, client_seed, nonce);
    stream.index(m)
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_reveal_round_trips() {
        let seed = generate_server_seed();
        let commitment = commit(&seed);
        assert!(verify(&seed, &commitment));
        assert!(!verify("wrong-seed", &commitment));
    }

    #[test]
    fn shuffle_is_deterministic() {
        let a = shuffle("serverseed", "clientseed", 7);
        let b = shuffle("serverseed", "clientseed", 7);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut deck = shuffle("serverseed", "clientseed", 1);
        deck.sort();
        assert_eq!(deck, (0..52u8).collect::<Vec<_>>());
    }

    #[test]
    fn different_nonce_changes_output() {
        let a = shuffle("serverseed", "clientseed", 1);
        let b = shuffle("serverseed", "clientseed", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn draw_index_is_deterministic_and_in_range() {
        for nonce in 0..50 {
            let v = draw_index("serverseed", "clientseed", nonce, 37);
            assert!(v < 37);
            assert_eq!(v, draw_index("serverseed", "clientseed", nonce, 37));
        }
    }
}
