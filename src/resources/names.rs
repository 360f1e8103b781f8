//! Random creature names from a read-only comma-separated corpus.
//!
//! The corpus is never copied or mutated; a pick copies one token into a
//! caller-provided byte buffer, truncating to fit and always leaving a NUL
//! terminator, so the result can be handed to C-style display code as is.

use arrayvec::ArrayString;
use bevy_ecs::prelude::Resource;

/// Buffer size used by [`NameCorpus::pick`], terminator included.
pub const NAME_CAP: usize = 16;

/// Built-in corpus.
pub const DEFAULT_NAMES: &str = "Rexy,Trixie,Spike,Pebbles,Bronto,Dina,Raptor,Cera,Littlefoot,\
Petrie,Ducky,Chomper,Sarah,Yoshi,Gertie,Bruno,Ollie,Mina,Zeno,Kiko,Tops,Rocky,Amber,Fern,\
Moss,Cinder,Nugget,Pip,Sauro,Tully,Iggy,Dot,Bramble,Juniper,Olive,Pistachio,Mango,Clover";

/// Number of comma-separated tokens: 0 for an empty corpus, otherwise the
/// number of commas plus one.
pub fn count(corpus: &str) -> usize {
    if corpus.is_empty() {
        0
    } else {
        corpus.bytes().filter(|&b| b == b',').count() + 1
    }
}

/// Token number `index`, found by skipping `index` commas.
pub fn token(corpus: &str, index: usize) -> Option<&str> {
    if corpus.is_empty() {
        return None;
    }
    corpus.split(',').nth(index)
}

/// Copy a uniformly random token into `buf`.
///
/// Writes at most `buf.len() - 1` bytes followed by a NUL and returns the
/// written text. An empty corpus writes an empty string. A zero-length
/// buffer is left untouched and yields `""`. Truncation never splits a
/// UTF-8 character.
pub fn pick_into<'a>(corpus: &str, rng: &mut fastrand::Rng, buf: &'a mut [u8]) -> &'a str {
    let Some(max) = buf.len().checked_sub(1) else {
        return "";
    };

    let n = count(corpus);
    let name = if n == 0 {
        ""
    } else {
        token(corpus, rng.usize(0..n)).unwrap_or("")
    };

    let mut len = name.len().min(max);
    while !name.is_char_boundary(len) {
        len -= 1;
    }
    buf[..len].copy_from_slice(&name.as_bytes()[..len]);
    buf[len] = 0;

    std::str::from_utf8(&buf[..len]).unwrap_or("")
}

/// Name corpus resource with its own random source.
#[derive(Resource, Debug, Clone)]
pub struct NameCorpus {
    corpus: &'static str,
    rng: fastrand::Rng,
}

impl Default for NameCorpus {
    fn default() -> Self {
        Self::new(DEFAULT_NAMES)
    }
}

impl NameCorpus {
    pub fn new(corpus: &'static str) -> Self {
        Self {
            corpus,
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic picks, for tests and `--seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn len(&self) -> usize {
        count(self.corpus)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick a name, truncated to `NAME_CAP - 1` bytes.
    pub fn pick(&mut self) -> ArrayString<NAME_CAP> {
        let mut buf = [0u8; NAME_CAP];
        let picked = pick_into(self.corpus, &mut self.rng, &mut buf);
        let mut name = ArrayString::new();
        // Always fits: pick_into leaves room for the terminator.
        let _ = name.try_push_str(picked);
        name
    }
}
