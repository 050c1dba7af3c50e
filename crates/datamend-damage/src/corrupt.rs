use rand::Rng;
use rand_chacha::ChaCha8Rng;

use datamend_core::values::parse_date;

/// Corrupt a non-empty cell value, picking one strategy with the rng.
///
/// Strategies mirror common healthcare data-entry defects: scrambled case,
/// stray characters, non-ISO date rendering, and whitespace padding.
pub fn corrupt_value(rng: &mut ChaCha8Rng, value: &str) -> String {
    // Dates get their own corruption so healing has a format to recover.
    if let Some(date) = parse_date(value) {
        if rng.random_bool(0.5) {
            return date.format("%d.%m.%Y").to_string();
        }
    }

    match rng.random_range(0..3u8) {
        0 => scramble_case(rng, value),
        1 => insert_junk(rng, value),
        _ => pad_whitespace(value),
    }
}

fn scramble_case(rng: &mut ChaCha8Rng, value: &str) -> String {
    let scrambled: String = value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphabetic() && rng.random_bool(0.5) {
                if ch.is_ascii_uppercase() {
                    ch.to_ascii_lowercase()
                } else {
                    ch.to_ascii_uppercase()
                }
            } else {
                ch
            }
        })
        .collect();
    if scrambled == value {
        // All draws kept the original casing; force one flip if possible.
        flip_first_letter(value)
    } else {
        scrambled
    }
}

fn flip_first_letter(value: &str) -> String {
    let mut flipped = String::with_capacity(value.len() + 1);
    let mut done = false;
    for ch in value.chars() {
        if !done && ch.is_ascii_alphabetic() {
            if ch.is_ascii_uppercase() {
                flipped.push(ch.to_ascii_lowercase());
            } else {
                flipped.push(ch.to_ascii_uppercase());
            }
            done = true;
        } else {
            flipped.push(ch);
        }
    }
    if done { flipped } else { format!("{value}#") }
}

fn insert_junk(rng: &mut ChaCha8Rng, value: &str) -> String {
    const JUNK: [char; 4] = ['#', '*', '~', '?'];
    let junk = JUNK[rng.random_range(0..JUNK.len())];
    let chars: Vec<char> = value.chars().collect();
    let position = rng.random_range(0..=chars.len());

    let mut corrupted = String::with_capacity(value.len() + 1);
    for (idx, ch) in chars.iter().enumerate() {
        if idx == position {
            corrupted.push(junk);
        }
        corrupted.push(*ch);
    }
    if position == chars.len() {
        corrupted.push(junk);
    }
    corrupted
}

fn pad_whitespace(value: &str) -> String {
    format!("  {value} ")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn corruption_always_changes_the_value() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for value in ["Alice", "2024-01-10", "42", "x"] {
            for _ in 0..50 {
                assert_ne!(corrupt_value(&mut rng, value), value);
            }
        }
    }

    #[test]
    fn corruption_is_deterministic_for_a_seed() {
        let mut first = ChaCha8Rng::seed_from_u64(3);
        let mut second = ChaCha8Rng::seed_from_u64(3);
        for value in ["Alice", "2024-01-10", "42"] {
            assert_eq!(
                corrupt_value(&mut first, value),
                corrupt_value(&mut second, value)
            );
        }
    }
}
