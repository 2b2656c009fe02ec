//! String similarity ratios on a 0-100 scale.
//!
//! All ratios are built on the indel ratio `200 * LCS(a, b) / (|a| + |b|)`, measured over
//! `char`s. Two empty strings are fully similar (100); an empty string against a non-empty one
//! scores 0.

use std::collections::{BTreeSet, HashMap};

/// Bit masks of a pattern's character positions, 64 positions per word.
///
/// Used to compute the length of the longest common subsequence between the pattern and any
/// text with the bit-parallel algorithm of Hyyrö, in `O(|text| * ceil(|pattern| / 64))`.
struct PatternMask {
    len: usize,
    words: usize,
    masks: HashMap<char, Vec<u64>>,
}

impl PatternMask {
    fn new(pattern: &[char]) -> Self {
        let len = pattern.len();
        let words = len.div_ceil(64).max(1);
        let mut masks: HashMap<char, Vec<u64>> = HashMap::new();

        for (i, ch) in pattern.iter().enumerate() {
            masks.entry(*ch).or_insert_with(|| vec![0; words])[i / 64] |= 1 << (i % 64);
        }

        Self { len, words, masks }
    }

    fn lcs(&self, text: &[char]) -> usize {
        if self.len == 0 || text.is_empty() {
            return 0;
        }

        let empty = vec![0u64; self.words];
        let mut v = vec![u64::MAX; self.words];

        for ch in text {
            let mask = self.masks.get(ch).unwrap_or(&empty);
            let mut carry = false;

            for (vw, &mw) in v.iter_mut().zip(mask) {
                let u = *vw & mw;
                let (sum, c1) = vw.overflowing_add(u);
                let (sum, c2) = sum.overflowing_add(carry as u64);
                carry = c1 || c2;
                *vw = sum | (*vw & !u);
            }
        }

        // Every zero bit within the pattern length is one matched character.
        v.iter()
            .enumerate()
            .map(|(i, word)| {
                let bits = (self.len - i * 64).min(64);
                let valid = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
                (!word & valid).count_ones() as usize
            })
            .sum()
    }
}

fn score(lcs: usize, len_a: usize, len_b: usize) -> f64 {
    if len_a + len_b == 0 {
        return 100.0;
    }

    200.0 * lcs as f64 / (len_a + len_b) as f64
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }

    let (pattern, text) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    score(PatternMask::new(pattern).lcs(text), a.len(), b.len())
}

/// Indel similarity of two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    ratio_chars(&a, &b)
}

/// Best indel similarity of the shorter string against any equally long window of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    best_window(&short, &long).score
}

/// The best window found by [`best_window`], and how many windows needed a full LCS.
struct WindowMatch {
    score: f64,
    scored: usize,
}

/// Slide a `short`-wide window over `long` and keep the best indel ratio.
///
/// Only windows that begin or end on a character of `short` (plus the two outermost windows) can
/// hold a best alignment, since any other window is matched at least as well by a neighbour. A
/// window is also skipped when the characters it shares with `short`, counted with
/// multiplicity, cannot beat the best score so far.
fn best_window(short: &[char], long: &[char]) -> WindowMatch {
    let width = short.len();
    let last = long.len() - width;
    let pattern = PatternMask::new(short);

    // Per character of `short`: occurrences in `short`, occurrences in the current window.
    let mut counts: HashMap<char, (usize, usize)> = HashMap::new();
    for ch in short {
        counts.entry(*ch).or_default().0 += 1;
    }

    let mut shared = 0;
    for ch in &long[..width] {
        if enter(&mut counts, *ch) {
            shared += 1;
        }
    }

    let mut best = WindowMatch { score: 0.0, scored: 0 };

    for start in 0..=last {
        if start > 0 {
            if leave(&mut counts, long[start - 1]) {
                shared -= 1;
            }
            if enter(&mut counts, long[start + width - 1]) {
                shared += 1;
            }
        }

        let anchored = start == 0 || start == last || counts.contains_key(&long[start]) || counts.contains_key(&long[start + width - 1]);

        if !anchored || score(shared, width, width) <= best.score {
            continue;
        }

        best.scored += 1;
        best.score = best.score.max(score(pattern.lcs(&long[start..start + width]), width, width));

        if best.score >= 100.0 {
            break;
        }
    }

    best
}

/// Count `ch` into the window; true when it adds a character shared with the pattern.
fn enter(counts: &mut HashMap<char, (usize, usize)>, ch: char) -> bool {
    match counts.get_mut(&ch) {
        Some((needed, seen)) => {
            *seen += 1;
            *seen <= *needed
        }
        None => false,
    }
}

/// Count `ch` out of the window; true when it removes a character shared with the pattern.
fn leave(counts: &mut HashMap<char, (usize, usize)>, ch: char) -> bool {
    match counts.get_mut(&ch) {
        Some((needed, seen)) => {
            *seen -= 1;
            *seen < *needed
        }
        None => false,
    }
}

/// Lowercase, replace non-alphanumeric characters with spaces, and trim.
pub fn default_process(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Word-order and repetition insensitive similarity of two strings.
///
/// Both strings go through [`default_process`] and are split into sorted token sets. The score
/// is driven by the shared tokens: if one set contains the other the score is 100, otherwise the
/// best ratio between the shared tokens and each side's full token list.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a = default_process(a);
    let b = default_process(b);
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let combined = |diff: &[&str]| {
        if sect.is_empty() { diff.join(" ") } else { format!("{sect} {}", diff.join(" ")) }
    };
    let combined_ab = combined(&diff_ab);
    let combined_ba = combined(&diff_ba);

    let mut best = ratio(&combined_ab, &combined_ba);

    if !sect.is_empty() {
        best = best.max(ratio(&sect, &combined_ab)).max(ratio(&sect, &combined_ba));
    }

    best
}
