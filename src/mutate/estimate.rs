//! Candidate-count estimation for progress display
//!
//! Predicts an upper bound without materializing output. The estimate may
//! overshoot the deduplicated total; it is a progress denominator, never a
//! hard limit.

use super::{glyph_pool, split_tokens, PatternCombiner, SAMPLED_GLYPHS};
use crate::types::{GenerationOptions, SubstitutionMode};

/// Case folding multiplies each word by roughly this many distinct forms
const CASE_FACTOR: u64 = 3;

/// Sampled substitution adds at most one variant per glyph class
const SAMPLED_FACTOR: u64 = 1 + SAMPLED_GLYPHS.len() as u64;

fn leet_factor(word: &str, mode: SubstitutionMode) -> u64 {
    match mode {
        SubstitutionMode::Sampled => SAMPLED_FACTOR,
        SubstitutionMode::Full => word
            .chars()
            .map(|c| glyph_pool(c).len() as u64)
            .fold(1u64, |acc, n| acc.saturating_mul(n)),
    }
}

/// Upper-bound candidate count for `tokens` under `options`, floored at 1.
/// All arithmetic saturates, so pathological token lengths cap out instead
/// of panicking.
pub fn estimate_total(tokens: &[String], options: &GenerationOptions) -> u64 {
    let mut total = 0u64;
    for token in tokens {
        let mut count = 1u64;
        if options.use_case {
            count = count.saturating_mul(CASE_FACTOR);
        }
        if options.use_leet {
            count = count.saturating_mul(leet_factor(token, options.mode));
        }
        total = total.saturating_add(count);
    }

    let mut combos = PatternCombiner::new(options).combine(tokens).len() as u64;
    if combos > 0 {
        if options.use_case {
            combos = combos.saturating_mul(CASE_FACTOR);
        }
        if options.use_leet {
            let (names, _) = split_tokens(tokens);
            if let Some(longest) = names.iter().max_by_key(|n| n.chars().count()) {
                combos = combos.saturating_mul(leet_factor(longest, options.mode));
            }
        }
    }

    total.saturating_add(combos).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutate::VariationGenerator;
    use crate::types::Depth;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_estimate_at_least_one() {
        let options = GenerationOptions {
            use_case: false,
            use_leet: false,
            ..GenerationOptions::default()
        };
        assert_eq!(estimate_total(&tokens(&["a"]), &options), 1);
        assert!(estimate_total(&tokens(&["admin", "2024"]), &options) >= 1);
    }

    #[test]
    fn test_estimate_scales_with_options() {
        let input = tokens(&["admin"]);
        let plain = estimate_total(
            &input,
            &GenerationOptions {
                use_case: false,
                use_leet: false,
                ..GenerationOptions::default()
            },
        );
        let cased = estimate_total(
            &input,
            &GenerationOptions {
                use_case: true,
                use_leet: false,
                ..GenerationOptions::default()
            },
        );
        assert_eq!(plain, 1);
        assert_eq!(cased, CASE_FACTOR);
    }

    #[test]
    fn test_estimate_full_mode_is_pool_product() {
        let input = tokens(&["ab"]);
        let options = GenerationOptions {
            use_case: false,
            use_leet: true,
            mode: SubstitutionMode::Full,
            ..GenerationOptions::default()
        };
        // a: 4 glyphs, b: 3 glyphs
        assert_eq!(estimate_total(&input, &options), 12);
    }

    #[test]
    fn test_estimate_saturates_on_long_tokens() {
        let long = "a".repeat(200);
        let options = GenerationOptions {
            mode: SubstitutionMode::Full,
            ..GenerationOptions::default()
        };
        assert_eq!(estimate_total(&[long], &options), u64::MAX);
    }

    #[test]
    fn test_estimate_is_upper_bound_without_year() {
        let input = tokens(&["admin", "bob", "2024"]);
        let options = GenerationOptions {
            year: None,
            depth: Depth::MEDIUM,
            use_case: true,
            use_leet: true,
            mode: SubstitutionMode::Sampled,
        };

        let generator = VariationGenerator::new(&options);
        let combiner = PatternCombiner::new(&options);
        let mut produced = std::collections::HashSet::new();
        for token in &input {
            produced.extend(generator.generate(token));
        }
        produced.extend(combiner.combine(&input));

        assert!(estimate_total(&input, &options) >= produced.len() as u64);
    }
}
