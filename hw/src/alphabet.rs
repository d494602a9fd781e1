//! Labels offered for collection when the config doesn't name any.

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "1234567890";
pub const MATH_SYMBOLS: &str = "√∫∑∞∝∠∧∨∩∪∴∵∼≈≠≡≤≥⊂⊃⊆⊇⊕⊗⊥⋅";

/// One label per character, in toolbar order, without repeats.
pub fn labels_from(sets: &[&str]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for c in sets.iter().flat_map(|set| set.chars()) {
        let label = c.to_string();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

pub fn default_alphabet() -> Vec<String> {
    labels_from(&[LOWERCASE, UPPERCASE, DIGITS, MATH_SYMBOLS])
}

#[test]
fn default_alphabet_order() {
    let labels = default_alphabet();
    assert_eq!(labels.len(), 26 + 26 + 10 + 26);
    assert_eq!(labels.first().map(String::as_str), Some("a"));
    assert_eq!(labels[52], "1");
    assert_eq!(labels[61], "0");
    assert!(labels.iter().any(|label| label == "∫"));
}

#[test]
fn no_repeats() {
    assert_eq!(labels_from(&["aba", "ca"]), ["a", "b", "c"]);
}
