/// Word content: the `WordSource` seam the engine pulls words through, the
/// shared prefix matcher, and a small built-in content table.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{FrenzySentence, PartialMatch, PowerUpDrop, PowerUpKind, Rarity, WordPair};
use crate::error::GameError;

/// Supplies every word the engine shows.  Swapped for fixtures in tests.
pub trait WordSource {
    /// Two distinct words, each optionally carrying a power-up.
    fn next_word_pair(&mut self, score: u64) -> WordPair;

    fn next_frenzy_sentence(&mut self) -> FrenzySentence;

    /// `count` unique words for a boss of the given theme.
    fn boss_word_pool(&mut self, theme: &str, count: usize) -> Result<Vec<String>, GameError>;
}

/// Case-insensitive prefix comparison.  `correct` stops at the first
/// mismatch; any input beyond it is an error.
pub fn partial_match(input: &str, target: &str) -> PartialMatch {
    let input: Vec<char> = input.to_lowercase().chars().collect();
    let target: Vec<char> = target.to_lowercase().chars().collect();

    let correct = input
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    PartialMatch {
        correct,
        total: target.len(),
        is_complete: correct == target.len() && input.len() == target.len(),
        has_error: input.len() > correct,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_score(score: u64) -> Self {
        match score {
            0..=19 => Difficulty::Easy,
            20..=49 => Difficulty::Medium,
            50..=99 => Difficulty::Hard,
            _ => Difficulty::Expert,
        }
    }
}

/// Probability that a word slot carries a power-up.
const POWER_UP_CHANCE: f64 = 0.6;

// ── Content ───────────────────────────────────────────────────────────────────

const EASY: &[&str] = &[
    "cat", "dog", "jump", "code", "game", "play", "type", "red", "blue", "green", "white",
    "black", "light", "dark", "small", "good", "bad", "hot", "cold", "new", "old", "move",
];
const MEDIUM: &[&str] = &[
    "keyboard", "mouse", "screen", "window", "button", "finger", "typing", "player", "points",
    "branch", "switch", "active", "smooth", "scroll", "render", "update", "function", "object",
    "array", "string", "number", "boolean", "return", "value", "method", "class",
];
const HARD: &[&str] = &[
    "development", "programming", "algorithm", "performance", "optimization", "responsive",
    "animation", "framework", "library", "component", "interface", "implementation",
    "debugging", "testing", "deployment", "repository", "configuration", "documentation",
    "synchronous", "asynchronous", "callback", "constructor", "prototype", "inheritance",
];
const EXPERT: &[&str] = &[
    "polymorphism", "encapsulation", "abstraction", "instantiation", "serialization",
    "deserialization", "authentication", "authorization", "refactoring", "architecture",
    "microservices", "containerization", "orchestration", "scalability", "maintainability",
    "observability", "interoperability", "compatibility", "accessibility", "usability",
];

fn plain_words(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
        Difficulty::Expert => EXPERT,
    }
}

fn power_up_words(kind: PowerUpKind, difficulty: Difficulty) -> &'static [&'static str] {
    use Difficulty::*;
    use PowerUpKind::*;
    match (kind, difficulty) {
        (Speed, Easy) => &["run", "fast", "go", "rush", "zoom", "dash"],
        (Speed, Medium) => &["speed", "quick", "boost", "sprint", "rapid"],
        (Speed, Hard) => &["velocity", "accelerate", "momentum", "propulsion"],
        (Speed, Expert) => &["acceleration", "instantaneous", "hypersonic"],
        (TimeWarp, Easy) => &["slow", "wait", "pause", "hold"],
        (TimeWarp, Medium) => &["delay", "halt", "stall"],
        (TimeWarp, Hard) => &["decelerate", "suspend", "temporal"],
        (TimeWarp, Expert) => &["chronostasis", "timewarp", "deceleration"],
        (Shield, Easy) => &["safe", "hide", "cover", "block", "guard"],
        (Shield, Medium) => &["shield", "protect", "defend", "armor"],
        (Shield, Hard) => &["protection", "defensive", "fortified"],
        (Shield, Expert) => &["invulnerable", "impenetrable", "reinforcement"],
        (Multiplier, Easy) => &["big", "more", "plus", "mega", "max"],
        (Multiplier, Medium) => &["power", "super", "ultra", "bonus"],
        (Multiplier, Hard) => &["amplify", "enhance", "multiply"],
        (Multiplier, Expert) => &["exponential", "magnification", "intensification"],
        (LaserFocus, Easy) => &["aim", "hit", "lock", "focus", "sharp"],
        (LaserFocus, Medium) => &["target", "precise", "accurate"],
        (LaserFocus, Hard) => &["precision", "calibrated", "concentrated"],
        (LaserFocus, Expert) => &["pinpoint", "meticulous", "unerring"],
        (Freeze, Easy) => &["freeze", "stop", "ice", "cold", "chill"],
        (Freeze, Medium) => &["frozen", "arctic", "glacial", "rigid"],
        (Freeze, Hard) => &["cryogenic", "absolute", "suspended"],
        (Freeze, Expert) => &["crystallized", "immobilized", "stagnation"],
    }
}

const FRENZY_SENTENCES: &[(&str, &[&str])] = &[
    (
        "programming",
        &[
            "the asynchronous function returned a promise that resolved with the encrypted token",
            "the microservices architecture used containers for scalable cloud deployment",
            "real-time data pipelines processed millions of events with high availability",
        ],
    ),
    (
        "cyberpunk",
        &[
            "the cyberpunk warrior navigated neon-lit corridors while dodging laser beams",
            "chrome towers pierced the smog-filled sky as hackers infiltrated corporate networks",
            "the rogue android escaped the laboratory carrying classified data chips",
        ],
    ),
    (
        "gaming",
        &[
            "the epic boss battle required precise timing to defeat the ancient dragon",
            "players explored vast open worlds filled with hidden treasures and dangerous monsters",
        ],
    ),
    (
        "space",
        &[
            "the interstellar spacecraft navigated through asteroid fields avoiding hostile patrols",
            "the space station orbited a binary star collecting data about gravitational anomalies",
        ],
    ),
];

const BOSS_WORDS: &[(&str, &[&str])] = &[
    (
        "tech",
        &[
            "virus", "malware", "exploit", "breach", "firewall", "packet", "protocol", "buffer",
            "overflow", "injection", "trojan", "rootkit", "backdoor", "phishing", "encryption",
            "decrypt", "hash", "kernel", "payload", "shellcode", "zombie", "botnet",
        ],
    ),
    (
        "programming",
        &[
            "exception", "null", "undefined", "syntax", "runtime", "compile", "debug", "stack",
            "heap", "pointer", "reference", "memory", "leak", "segfault", "deadlock",
            "recursion", "infinite", "loop", "overflow", "underflow",
        ],
    ),
    (
        "errors",
        &[
            "fatal", "critical", "warning", "deprecated", "invalid", "timeout", "refused",
            "forbidden", "unauthorized", "conflict", "corrupted", "missing", "broken", "failed",
            "crashed", "terminated", "aborted", "rejected", "denied",
        ],
    ),
    (
        "debugging",
        &[
            "breakpoint", "watchpoint", "backtrace", "stacktrace", "assertion", "verbose",
            "trace", "inspect", "evaluate", "profile", "benchmark", "monitor", "analyze",
            "diagnose", "examine", "investigate", "troubleshoot", "resolve", "patch", "hotfix",
        ],
    ),
];

// ── Built-in source ───────────────────────────────────────────────────────────

/// Word source backed by the tables above.
pub struct BuiltinWords<R: Rng> {
    rng: R,
}

impl<R: Rng> BuiltinWords<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn rarity(&mut self) -> Rarity {
        let roll: f64 = self.rng.gen();
        if roll < 0.05 {
            Rarity::Epic
        } else if roll < 0.25 {
            Rarity::Rare
        } else {
            Rarity::Common
        }
    }

    fn pick(&mut self, words: &[&str]) -> String {
        words.choose(&mut self.rng).copied().unwrap_or("type").to_string()
    }

    fn slot(&mut self, difficulty: Difficulty, with_power_up: bool) -> (String, Option<PowerUpDrop>) {
        if with_power_up {
            let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
            let word = self.pick(power_up_words(kind, difficulty));
            let rarity = self.rarity();
            (word, Some(PowerUpDrop { kind, rarity }))
        } else {
            (self.pick(plain_words(difficulty)), None)
        }
    }
}

impl<R: Rng> WordSource for BuiltinWords<R> {
    fn next_word_pair(&mut self, score: u64) -> WordPair {
        let difficulty = Difficulty::from_score(score);
        let first_power_up = self.rng.gen_bool(POWER_UP_CHANCE);
        let second_power_up = self.rng.gen_bool(POWER_UP_CHANCE);

        let (first, first_drop) = self.slot(difficulty, first_power_up);
        let (mut second, mut second_drop) = self.slot(difficulty, second_power_up);
        while second == first {
            (second, second_drop) = self.slot(difficulty, second_power_up);
        }

        WordPair {
            words: [first, second],
            power_ups: [first_drop, second_drop],
        }
    }

    fn next_frenzy_sentence(&mut self) -> FrenzySentence {
        let (theme, sentences) = FRENZY_SENTENCES[self.rng.gen_range(0..FRENZY_SENTENCES.len())];
        let sentence = self.pick(sentences);
        FrenzySentence {
            theme: theme.to_string(),
            words: sentence.split_whitespace().map(str::to_string).collect(),
        }
    }

    fn boss_word_pool(&mut self, theme: &str, count: usize) -> Result<Vec<String>, GameError> {
        let pool = BOSS_WORDS
            .iter()
            .find(|(t, _)| *t == theme)
            .or_else(|| BOSS_WORDS.first())
            .map(|(_, words)| *words)
            .unwrap_or(&[]);

        if pool.len() < count {
            return Err(GameError::BossWordPool {
                theme: theme.to_string(),
                needed: count,
                available: pool.len(),
            });
        }

        let mut words: Vec<String> = pool
            .choose_multiple(&mut self.rng, count)
            .map(|w| w.to_string())
            .collect();
        words.shuffle(&mut self.rng);
        Ok(words)
    }
}
