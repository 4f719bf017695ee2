//! Token estimation for sizing context slices against model windows

const CODE_CHARS_PER_TOKEN: f64 = 2.5;
const MARKUP_CHARS_PER_TOKEN: f64 = 3.0;
const PROSE_CHARS_PER_TOKEN: f64 = 4.0;

/// Estimate BPE token count of a chat message
///
/// Blends chars-per-token ratios by how code-like, markup-like, or
/// prose-like the text looks. Lines inside ``` fences count as code.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let total_chars = text.chars().count();
    let total_lines = text.lines().count().max(1);

    let symbol_chars = text
        .chars()
        .filter(|&c| "{}[]();=<>|&!@$%^*~`\\".contains(c))
        .count();
    let markup_chars = text.chars().filter(|&c| "#-*_>".contains(c)).count();

    let mut in_fence = false;
    let mut code_lines = 0;
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            code_lines += 1;
        } else if in_fence || line.starts_with("    ") || line.starts_with('\t') {
            code_lines += 1;
        }
    }
    let code_line_ratio = code_lines as f64 / total_lines as f64;

    let code_fraction =
        ((symbol_chars as f64 / total_chars as f64) * 10.0 + code_line_ratio * 0.5).min(1.0);
    let markup_fraction =
        ((markup_chars as f64 / total_chars as f64) * 8.0).min(1.0 - code_fraction);
    let prose_fraction = 1.0 - code_fraction - markup_fraction;

    let chars_per_token = code_fraction * CODE_CHARS_PER_TOKEN
        + markup_fraction * MARKUP_CHARS_PER_TOKEN
        + prose_fraction * PROSE_CHARS_PER_TOKEN;

    (total_chars as f64 / chars_per_token).max(1.0) as usize
}
