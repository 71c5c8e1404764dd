//! Human-pattern combination - name+name and name+number pairings

use super::CandidateSet;
use crate::types::{Depth, GenerationOptions};

/// Separators tried between two names
const PAIR_SEPARATORS: &[&str] = &["", ".", "_", "-"];

/// Symbols tried between a base and a number
const SYMBOLS: &[&str] = &["", "@", "!"];

/// Split tokens into names and numbers. Purely numeric tokens of length 2 or
/// 4 are treated as two/four-digit years; everything else is a name.
pub fn split_tokens(tokens: &[String]) -> (Vec<&str>, Vec<&str>) {
    let mut names = Vec::new();
    let mut numbers = Vec::new();
    for token in tokens {
        let digits = token.chars().all(|c| c.is_ascii_digit());
        if digits && matches!(token.chars().count(), 2 | 4) {
            numbers.push(token.as_str());
        } else {
            names.push(token.as_str());
        }
    }
    (names, numbers)
}

/// Combines tokens the way people build passwords: paired names, names glued
/// to years, symbol separators.
pub struct PatternCombiner {
    year: Option<String>,
    depth: Depth,
}

impl PatternCombiner {
    pub fn new(options: &GenerationOptions) -> Self {
        Self {
            year: options.effective_year().map(str::to_string),
            depth: options.depth,
        }
    }

    /// All combinations over `tokens`, deduplicated, in production order.
    /// A token is never paired with itself.
    pub fn combine(&self, tokens: &[String]) -> Vec<String> {
        let (names, numbers) = split_tokens(tokens);
        let mut set = CandidateSet::new();

        // name + name, both orderings
        for &a in &names {
            for &b in &names {
                if a == b {
                    continue;
                }
                for sep in PAIR_SEPARATORS {
                    let base = format!("{a}{sep}{b}");
                    for &num in &numbers {
                        for sym in SYMBOLS {
                            set.insert(format!("{base}{sym}{num}"));
                        }
                        set.insert(format!("{num}{base}"));
                    }
                    if self.depth >= Depth::HEAVY {
                        if let Some(year) = &self.year {
                            set.insert(format!("{base}{year}"));
                        }
                    }
                    set.insert(base);
                }
            }
        }

        // name + number, no second name required
        for &name in &names {
            for &num in &numbers {
                for sym in SYMBOLS {
                    set.insert(format!("{name}{sym}{num}"));
                }
                set.insert(format!("{num}{name}"));
            }
        }

        set.into_vec()
    }
}
