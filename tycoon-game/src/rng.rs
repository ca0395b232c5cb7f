//! Injectable randomness for catalog draws.
use hmac::{Hmac, Mac};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::collections::VecDeque;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_RANDOM_WIDTH: usize = 7;
const ID_RANDOM_SPACE: u64 = 36u64.pow(7);

/// Independent draw streams so task, challenge and message draws do not
/// perturb one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawStream {
    Task,
    Challenge,
    Message,
}

/// Randomness consumed by the content catalog.
pub trait RandomSource {
    /// Uniform index in `0..len`. Returns 0 when `len` is 0 or 1.
    fn pick_index(&mut self, stream: DrawStream, len: usize) -> usize;

    /// Identifier this source has never returned before.
    fn mint_id(&mut self) -> String;
}

/// Seeded source deriving one ChaCha stream per [`DrawStream`] from a user seed.
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    task: CountingRng<ChaCha20Rng>,
    challenge: CountingRng<ChaCha20Rng>,
    message: CountingRng<ChaCha20Rng>,
    ids: CountingRng<ChaCha20Rng>,
    serial: u64,
}

impl SeededSource {
    /// Construct the source from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            task: CountingRng::new(derive_stream_seed(seed, b"task")),
            challenge: CountingRng::new(derive_stream_seed(seed, b"challenge")),
            message: CountingRng::new(derive_stream_seed(seed, b"message")),
            ids: CountingRng::new(derive_stream_seed(seed, b"ids")),
            serial: 0,
        }
    }

    /// Seed from OS entropy, for hosts that do not need replay.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(rand::random())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws performed on a stream.
    #[must_use]
    pub const fn draws(&self, stream: DrawStream) -> u64 {
        match stream {
            DrawStream::Task => self.task.draws(),
            DrawStream::Challenge => self.challenge.draws(),
            DrawStream::Message => self.message.draws(),
        }
    }

    fn stream_mut(&mut self, stream: DrawStream) -> &mut CountingRng<ChaCha20Rng> {
        match stream {
            DrawStream::Task => &mut self.task,
            DrawStream::Challenge => &mut self.challenge,
            DrawStream::Message => &mut self.message,
        }
    }
}

impl RandomSource for SeededSource {
    fn pick_index(&mut self, stream: DrawStream, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.stream_mut(stream).gen_range(0..len)
    }

    fn mint_id(&mut self) -> String {
        self.serial = self.serial.saturating_add(1);
        let mut id = encode_base36(self.ids.next_u64() % ID_RANDOM_SPACE, ID_RANDOM_WIDTH);
        id.push_str(&encode_base36(self.serial, 1));
        id
    }
}

/// Replays a fixed list of indices (wrapped into range) for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    picks: VecDeque<usize>,
    serial: u64,
}

impl ScriptedSource {
    /// Source that cycles through `picks`; an empty script always picks 0.
    #[must_use]
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            serial: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn pick_index(&mut self, _stream: DrawStream, len: usize) -> usize {
        let Some(next) = self.picks.pop_front() else {
            return 0;
        };
        self.picks.push_back(next);
        if len == 0 { 0 } else { next % len }
    }

    fn mint_id(&mut self) -> String {
        self.serial = self.serial.saturating_add(1);
        format!("task-{}", self.serial)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

fn encode_base36(mut value: u64, min_width: usize) -> String {
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(ID_ALPHABET[usize::try_from(value % 36).unwrap_or(0)]);
        value /= 36;
    }
    while digits.len() < min_width {
        digits.push(b'0');
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}
