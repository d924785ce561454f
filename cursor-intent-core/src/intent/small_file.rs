use crate::config::constants::intent::DEFAULT_SMALL_FILE_LINE_THRESHOLD;

/// Whether a file has too little code for targeted completion
pub fn is_small_file(text: &str, total_comment_lines: usize) -> bool {
    is_small_file_with_threshold(text, total_comment_lines, DEFAULT_SMALL_FILE_LINE_THRESHOLD)
}

/// Non-blank lines minus comment lines, compared against `threshold`
pub fn is_small_file_with_threshold(
    text: &str,
    total_comment_lines: usize,
    threshold: usize,
) -> bool {
    let non_blank = text.split('\n').filter(|line| !line.trim().is_empty()).count();
    non_blank.saturating_sub(total_comment_lines) < threshold
}
