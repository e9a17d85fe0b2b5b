//! OCR confusion correction for numeric fields.
//!
//! Receipt printers use narrow fonts where `o`, `l` and `i` are routinely
//! recognized in place of `0` and `1`. [`normalize`] biases text towards
//! digits. It does not look at context for `o`, so words get mangled
//! (`Shell Road` becomes `Shell R0ad`); callers that need readable text keep
//! the raw string next to the normalized one.

/// Replace digit look-alikes with digits.
///
/// Applied in order:
/// 1. every `o`/`O` becomes `0`;
/// 2. a lowercase `l` that is not preceded by an ASCII letter and not
///    followed by a word character becomes `1`;
/// 3. the same rule for a lowercase `i`.
///
/// The function is idempotent.
pub fn normalize(text: &str) -> String {
    let zeroed: String = text
        .chars()
        .map(|c| if matches!(c, 'o' | 'O') { '0' } else { c })
        .collect();
    let ones = replace_standalone(&zeroed, 'l');
    replace_standalone(&ones, 'i')
}

/// Replace `target` with `1` where it stands alone. Neighbours are judged on
/// the input, not on earlier replacements.
fn replace_standalone(text: &str, target: char) -> String {
    let chars: Vec<char> = text.chars().collect();

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c != target {
                return c;
            }
            let after_letter = i > 0 && chars[i - 1].is_ascii_alphabetic();
            let before_word = chars.get(i + 1).is_some_and(|&next| is_word_char(next));
            if after_letter || before_word { c } else { '1' }
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
