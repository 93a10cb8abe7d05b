//! Longest common subsequence over phoneme symbols.
//!
//! `L[i][j]` is the LCS length of `a[..i]` and `b[..j]`.  The table is stored
//! row-major in one `Vec` of `(m + 1) * (n + 1)` cells; time and space are
//! `O(m·n)`, which is fine for utterance-length phoneme strings.

use super::sequence::PhonemeSequence;

/// Row-major LCS length table with `(a.len() + 1) * (b.len() + 1)` cells.
pub fn lcs_table(a: &[String], b: &[String]) -> Vec<usize> {
    let cols = b.len() + 1;
    let mut table = vec![0usize; (a.len() + 1) * cols];

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i * cols + j] = if a[i - 1] == b[j - 1] {
                table[(i - 1) * cols + (j - 1)] + 1
            } else {
                table[(i - 1) * cols + j].max(table[i * cols + (j - 1)])
            };
        }
    }

    table
}

/// The LCS symbol sequence of `hypothesis` and `reference`.
///
/// Backtracking starts at `L[m][n]`.  On a mismatch with equal sub-scores
/// the walk steps along the hypothesis axis (`i - 1`) rather than the
/// reference axis, so the result is reproducible for a given input pair.
pub fn longest_common_subsequence(
    hypothesis: &PhonemeSequence,
    reference: &PhonemeSequence,
) -> PhonemeSequence {
    let a = hypothesis.symbols();
    let b = reference.symbols();
    let cols = b.len() + 1;
    let table = lcs_table(a, b);

    let mut out: Vec<&str> = Vec::with_capacity(table[a.len() * cols + b.len()]);
    let (mut i, mut j) = (a.len(), b.len());

    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            out.push(&a[i - 1]);
            i -= 1;
            j -= 1;
        } else if table[(i - 1) * cols + j] >= table[i * cols + (j - 1)] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    out.reverse();
    PhonemeSequence::from_symbols(out)
}
