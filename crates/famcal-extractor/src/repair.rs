//! Repair of truncated model output
//!
//! Small models with a tight token budget often stop mid-object. Appending
//! the missing closers is usually enough to recover a parseable reply.

/// Maximum number of closing symbols appended by [`repair_truncated_json`]
pub const MAX_REPAIRS: usize = 5;

/// Balance unclosed brackets, then unclosed braces, by appending closers
///
/// Returns the repaired text and the number of symbols appended. Counting is
/// purely lexical (symbols inside string literals count too), and brackets
/// and braces share one budget of [`MAX_REPAIRS`] insertions.
pub fn repair_truncated_json(text: &str) -> (String, usize) {
    repair_with_limit(text, MAX_REPAIRS)
}

/// [`repair_truncated_json`] with an explicit insertion budget
pub fn repair_with_limit(text: &str, limit: usize) -> (String, usize) {
    let count = |c: char| text.chars().filter(|&x| x == c).count();
    let missing_brackets = count('[').saturating_sub(count(']'));
    let missing_braces = count('{').saturating_sub(count('}'));

    let brackets = missing_brackets.min(limit);
    let braces = missing_braces.min(limit - brackets);

    let mut repaired = String::with_capacity(text.len() + brackets + braces);
    repaired.push_str(text);
    repaired.extend(std::iter::repeat(']').take(brackets));
    repaired.extend(std::iter::repeat('}').take(braces));

    (repaired, brackets + braces)
}
