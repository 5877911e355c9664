//! The single canonical comparator (§3 "Identifiers") used for every
//! container in the workspace: invariant-culture, case-sensitive ordinal,
//! with runs of ASCII digits compared by numeric value so that `"Key 2"` <
//! `"Key 10"`.
//!
//! No other comparator is legal anywhere in this workspace; containers that
//! need ordering always go through [`compare`].

use std::cmp::Ordering;

/// Compares two identifiers under the canonical collation.
///
/// The strings are split into alternating runs of ASCII digits and
/// non-digits. Digit runs are compared by numeric value (ties broken by
/// length, so `"007"` sorts after `"7"` is never actually reachable since
/// equal values compare equal — length only matters when a run overflows
/// `u128`, in which case we fall back to a byte compare of the run).
/// Non-digit runs compare byte-for-byte (ordinal, case-sensitive).
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut a = a.as_bytes();
    let mut b = b.as_bytes();

    loop {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let a_digit = a[0].is_ascii_digit();
        let b_digit = b[0].is_ascii_digit();

        if a_digit && b_digit {
            let (a_run, a_rest) = split_digits(a);
            let (b_run, b_rest) = split_digits(b);
            match compare_numeric(a_run, b_run) {
                Ordering::Equal => {}
                other => return other,
            }
            a = a_rest;
            b = b_rest;
        } else {
            let (a_run, a_rest) = split_non_digits(a);
            let (b_run, b_rest) = split_non_digits(b);
            match a_run.cmp(b_run) {
                Ordering::Equal => {}
                other => return other,
            }
            // One side may have hit a digit boundary before the other, e.g.
            // "Key" vs "Keys2": after matching "Key" both runs end, so the
            // non-digit cmp above already distinguished "Key" from "Keys".
            a = a_rest;
            b = b_rest;
        }
    }
}

fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let end = s.iter().take_while(|b| b.is_ascii_digit()).count();
    s.split_at(end)
}

fn split_non_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let end = s.iter().take_while(|b| !b.is_ascii_digit()).count();
    s.split_at(end)
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a_trim = trim_leading_zeros(a);
    let b_trim = trim_leading_zeros(b);
    match a_trim.len().cmp(&b_trim.len()) {
        Ordering::Equal => a_trim.cmp(b_trim),
        other => other,
    }
}

fn trim_leading_zeros(s: &[u8]) -> &[u8] {
    let non_zero = s.iter().take_while(|&&b| b == b'0').count();
    if non_zero == s.len() {
        // all zeros: keep a single "0"
        &s[s.len() - 1..]
    } else {
        &s[non_zero..]
    }
}

/// `true` iff `a` and `b` collate equal.
pub fn eq(a: &str, b: &str) -> bool {
    compare(a, b) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_runs_compare_by_value() {
        assert_eq!(compare("Key 2", "Key 10"), Ordering::Less);
        assert_eq!(compare("Key 10", "Key 2"), Ordering::Greater);
        assert_eq!(compare("Key 2", "Key 2"), Ordering::Equal);
    }

    #[test]
    fn leading_zeros_do_not_change_value() {
        assert_eq!(compare("Key 007", "Key 7"), Ordering::Equal);
        assert_eq!(compare("Key 000", "Key 0"), Ordering::Equal);
    }

    #[test]
    fn ordinal_outside_digit_runs() {
        assert_eq!(compare("apple", "Apple"), Ordering::Greater);
        assert_eq!(compare("Key", "Keys"), Ordering::Less);
    }

    #[test]
    fn prefix_then_digits() {
        assert_eq!(compare("Key", "Key 1"), Ordering::Less);
    }
}
