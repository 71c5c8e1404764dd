//! Per-token mutation - case patterns, substitution variants, year weaving

use super::{glyph_pool, CandidateSet, CasePattern, COMMON_SUFFIXES, SAMPLED_GLYPHS, YEAR_SEPARATORS};
use crate::types::{Depth, GenerationOptions, SubstitutionMode};

/// Generates the mutated forms of a single token.
///
/// Output preserves first-production order, so the same token and options
/// always yield the same sequence.
pub struct VariationGenerator {
    options: GenerationOptions,
}

impl VariationGenerator {
    pub fn new(options: &GenerationOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }

    /// All mutated forms of `token`, deduplicated, in production order
    pub fn generate(&self, token: &str) -> Vec<String> {
        let mut set = CandidateSet::new();
        if token.is_empty() {
            return set.into_vec();
        }

        let case_patterns: &[CasePattern] = if self.options.use_case {
            &CasePattern::ALL
        } else {
            &[CasePattern::Lower]
        };
        let year = self.options.effective_year();
        let deep = self.options.depth >= Depth::MEDIUM;

        for pattern in case_patterns {
            let base = pattern.apply(token);
            for variant in self.substitutions(&base) {
                if let Some(year) = year {
                    set.insert(format!("{variant}{year}"));
                    set.insert(format!("{year}{variant}"));
                    if deep {
                        for sep in YEAR_SEPARATORS {
                            set.insert(format!("{variant}{sep}{year}"));
                            set.insert(format!("{year}{sep}{variant}"));
                        }
                    }
                }
                set.insert(variant);
            }
        }

        // Common suffixes stick to the plainly-cased word, not to every
        // substitution variant
        if deep {
            let suffix_patterns: &[CasePattern] = if self.options.use_case {
                &[CasePattern::Lower, CasePattern::Title]
            } else {
                &[CasePattern::Lower]
            };
            for pattern in suffix_patterns {
                let base = pattern.apply(token);
                for suffix in COMMON_SUFFIXES {
                    set.insert(format!("{base}{suffix}"));
                }
            }
        }

        set.into_vec()
    }

    fn substitutions(&self, word: &str) -> Vec<String> {
        if !self.options.use_leet {
            return vec![word.to_string()];
        }
        match self.options.mode {
            SubstitutionMode::Sampled => sampled_substitutions(word),
            SubstitutionMode::Full => full_substitutions(word),
        }
    }
}

/// The word plus at most one whole-word variant per substitutable character
/// class present in it
pub(crate) fn sampled_substitutions(word: &str) -> Vec<String> {
    let mut out = vec![word.to_string()];
    let lower = word.to_lowercase();

    for &(class, glyph) in SAMPLED_GLYPHS {
        if !lower.contains(class) {
            continue;
        }
        let replaced: String = word
            .chars()
            .map(|c| {
                if c.to_ascii_lowercase() == class {
                    glyph
                } else {
                    c
                }
            })
            .collect();
        if replaced != *word && !out.contains(&replaced) {
            out.push(replaced);
        }
    }

    out
}

/// Cartesian product over each position's glyph pool. The result size is
/// exactly the product of the per-position pool sizes.
pub(crate) fn full_substitutions(word: &str) -> Vec<String> {
    let pools: Vec<Vec<char>> = word.chars().map(glyph_pool).collect();

    let mut results = vec![String::new()];
    for pool in &pools {
        let mut next = Vec::with_capacity(results.len() * pool.len());
        for prefix in &results {
            for &c in pool {
                let mut candidate = String::with_capacity(prefix.len() + c.len_utf8());
                candidate.push_str(prefix);
                candidate.push(c);
                next.push(candidate);
            }
        }
        results = next;
    }

    results
}
