use crate::tree_sitter::Position;

/// Byte offset of an editor position.
///
/// Lines past the end clamp to the end of the text, columns past the end of
/// a line clamp to the end of that line. Columns count characters.
pub fn offset_at_position(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for (index, line) in text.split('\n').enumerate() {
        if index == position.line {
            let column = line
                .char_indices()
                .nth(position.character)
                .map_or(line.len(), |(offset, _)| offset);
            return line_start + column;
        }
        line_start += line.len() + 1;
    }
    text.len()
}

/// Split a document into the text before and after the cursor
pub fn split_text_at_position(text: &str, position: Position) -> (String, String) {
    let (prefix, suffix) = text.split_at(offset_at_position(text, position));
    (prefix.to_string(), suffix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mid_line() {
        let (prefix, suffix) = split_text_at_position("fn a() {\n    \n}\n", Position::new(1, 4));
        assert_eq!(prefix, "fn a() {\n    ");
        assert_eq!(suffix, "\n}\n");
    }

    #[test]
    fn test_split_clamps() {
        let text = "ab\ncd";
        assert_eq!(split_text_at_position(text, Position::new(0, 99)).0, "ab");
        assert_eq!(split_text_at_position(text, Position::new(7, 0)).0, text);
        assert_eq!(split_text_at_position(text, Position::new(0, 0)).1, text);
        assert_eq!(offset_at_position("", Position::new(3, 3)), 0);
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "// café\nx";
        assert_eq!(offset_at_position(text, Position::new(0, 7)), "// café".len());
        assert_eq!(offset_at_position(text, Position::new(1, 0)), "// café\n".len());
    }
}
