//! Text similarity for free-text market labels.
//!
//! Scores are Ratcliff/Obershelp ("gestalt pattern matching") ratios:
//! `2 * M / (|a| + |b|)`, where `M` counts the characters in the matching
//! blocks found by repeatedly taking the longest common contiguous run and
//! recursing on the text either side of it.

use std::collections::{HashMap, HashSet};

/// Length at which characters that occur in more than 1% of the second
/// string stop seeding matches (they can still extend one).
const POPULAR_MIN_LEN: usize = 200;

/// Similarity of two labels in [0, 1], ignoring case and surrounding whitespace.
///
/// Two empty labels score 1.0; guard empty input at the call site when that
/// is not wanted.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().trim().chars().collect();
    let b: Vec<char> = b.to_lowercase().trim().chars().collect();
    sequence_ratio(&a, &b)
}

/// Ratcliff/Obershelp ratio over two character sequences.
#[must_use]
pub fn sequence_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = BlockMatcher::new(a, b).matching_characters();
    2.0 * matches as f64 / total as f64
}

/// Normalizes a name for token comparison.
///
/// Lower-cases, drops `.` and `,`, collapses double spaces and trims, so
/// "Keir  Starmer, K.C." becomes "keir starmer kc".
#[must_use]
pub fn normalize_name(text: &str) -> String {
    text.to_lowercase()
        .replace(['.', ','], "")
        .replace("  ", " ")
        .trim()
        .to_string()
}

/// Significant tokens of a normalized name: single characters are dropped.
#[must_use]
pub fn name_tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|w| w.chars().count() > 1)
        .collect()
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character in `b`, minus popular characters.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(c, _)| *c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest common block in `a[alo..ahi]` x `b[blo..bhi]`.
    ///
    /// Ties resolve to the earliest start in `a`, then in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut run_len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_run_len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j > 0 {
                        run_len.get(&(j - 1)).copied().unwrap_or(0) + 1
                    } else {
                        1
                    };
                    next_run_len.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        // Popular characters never seed a block but may extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi
            && best_j + best_k < bhi
            && self.a[best_i + best_k] == self.b[best_j + best_k]
        {
            best_k += 1;
        }

        (best_i, best_j, best_k)
    }

    fn matching_characters(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}
