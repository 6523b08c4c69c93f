//! Game and server configuration

use std::env;
use std::time::Duration;

/// Length of a round in seconds
pub const ROUND_SECONDS: u32 = 70;

/// Remaining time is clamped down to this once someone guesses correctly
pub const GUESS_FLOOR_SECONDS: u32 = 10;

/// Countdown tick period in milliseconds
pub const TICK_MS: u64 = 1000;

/// Hint period base; divided by half the word length
pub const HINT_BASE_MS: u64 = 60_000;

/// Pause between the end of a round and the start of the next one
pub const NEXT_ROUND_DELAY_MS: u64 = 5_000;

/// Words shorter than this are filtered out of the word list
pub const MIN_WORD_LEN: usize = 4;

/// A round needs at least this many named participants
pub const MIN_ACTIVE_PLAYERS: usize = 2;

/// Largest accepted canvas snapshot (encoded image string)
pub const MAX_SNAPSHOT_BYTES: usize = 8 * 1024 * 1024;

/// Snapshots kept in the drawing history; the oldest is dropped beyond this
pub const MAX_HISTORY_ENTRIES: usize = 64;

/// Longer display names are cut to this many characters
pub const MAX_NAME_LEN: usize = 32;

/// Default HTTP port
pub const SERVER_PORT: u16 = 8080;

/// Default word list location
pub const WORDS_FILE: &str = "words.txt";

/// Default static asset directory
pub const STATIC_DIR: &str = "static";

/// Used when the word file is missing or filters down to nothing
pub const FALLBACK_WORDS: &[&str] = &[
    "apple",
    "banana",
    "bicycle",
    "castle",
    "dragon",
    "elephant",
    "guitar",
    "ice cream",
    "lighthouse",
    "mango",
    "mountain",
    "octopus",
    "pirate ship",
    "rainbow",
    "snowman",
    "sunflower",
    "telescope",
    "umbrella",
    "volcano",
    "windmill",
];

/// Timing knobs of the round state machine
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub round_seconds: u32,
    pub guess_floor_seconds: u32,
    pub tick: Duration,
    pub hint_base: Duration,
    pub next_round_delay: Duration,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Interval between letter reveals: longer words reveal faster.
    pub fn hint_period(&self, word_len: usize) -> Duration {
        let len = word_len.max(2) as u32;
        self.hint_base * 2 / len
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            guess_floor_seconds: GUESS_FLOOR_SECONDS,
            tick: Duration::from_millis(TICK_MS),
            hint_base: Duration::from_millis(HINT_BASE_MS),
            next_round_delay: Duration::from_millis(NEXT_ROUND_DELAY_MS),
            seed: None,
        }
    }
}

/// Process-level settings read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub words_file: String,
    pub static_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(SERVER_PORT);

        Self {
            port,
            words_file: env::var("WORDS_FILE").unwrap_or_else(|_| WORDS_FILE.to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| STATIC_DIR.to_string()),
        }
    }
}
