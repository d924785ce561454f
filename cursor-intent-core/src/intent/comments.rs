//! Comment Resolver: finds the comment at or directly above the cursor

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;
use tree_sitter::{Node, QueryCursor, StreamingIterator};

use crate::config::constants::intent::DEFAULT_EMPTY_COMMENT_MAX_ALPHANUMERICS;
use crate::tree_sitter::{ParsedDocument, Point, QueryCache, QueryKind, SyntaxTree};

/// The query capture a comment came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentCapture {
    pub name: String,
    pub node_kind: String,
    pub start_byte: usize,
    pub end_byte: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub start: Point,
    pub end: Point,
    pub content: String,
    pub capture: CommentCapture,
}

impl Comment {
    fn from_node(node: Node<'_>, capture_name: &str, tree: &SyntaxTree) -> Self {
        Self {
            start: node.start_position().into(),
            end: node.end_position().into(),
            content: tree.text_of(node).to_string(),
            capture: CommentCapture {
                name: capture_name.to_string(),
                node_kind: node.kind().to_string(),
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
            },
        }
    }

    /// Whether `row` lies within the comment's lines
    pub fn spans_row(&self, row: usize) -> bool {
        self.start.row <= row && row <= self.end.row
    }
}

/// Where the resolved comment sits relative to the cursor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommentResolution {
    #[serde(rename = "comment_at_cursor")]
    AtCursor(Comment),
    #[serde(rename = "comment_above_cursor")]
    AboveCursor(Comment),
}

impl CommentResolution {
    pub fn comment(&self) -> &Comment {
        match self {
            CommentResolution::AtCursor(comment) | CommentResolution::AboveCursor(comment) => {
                comment
            }
        }
    }
}

#[derive(Debug)]
pub struct CommentResolver {
    queries: QueryCache,
}

impl Default for CommentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentResolver {
    pub fn new() -> Self {
        Self {
            queries: QueryCache::new(QueryKind::Comments),
        }
    }

    /// Every comment capture in the document, in document order
    pub fn comments_for_tree(&self, document: &ParsedDocument) -> Vec<Comment> {
        self.captured_comments(document)
            .into_iter()
            .map(|(comment, _)| comment)
            .collect()
    }

    fn captured_comments<'t>(&self, document: &'t ParsedDocument) -> Vec<(Comment, Node<'t>)> {
        let language = document.language_name();
        let Some(query) = self.queries.get(language, &document.language) else {
            debug!(%language, "CommentResolver: No comment query for language");
            return Vec::new();
        };

        let tree = &document.tree;
        let names = query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(query, tree.root_node(), tree.source().as_bytes());

        let mut comments = Vec::new();
        while let Some((query_match, index)) = captures.next() {
            let capture = query_match.captures[*index];
            let name = names.get(capture.index as usize).copied().unwrap_or("comment");
            comments.push((Comment::from_node(capture.node, name, tree), capture.node));
        }
        comments
    }

    /// Resolve the comment on the cursor row, or the nearest valid one above it.
    ///
    /// A comment above the cursor only counts when the cursor is still inside
    /// the comment's enclosing node and no sibling of the comment starts on a
    /// row between the comment's last row and the cursor row.
    pub fn get_comment_for_cursor(
        &self,
        document: &ParsedDocument,
        cursor: Point,
    ) -> Option<CommentResolution> {
        let comments = self.captured_comments(document);

        if let Some((comment, _)) = last_comment(
            comments
                .iter()
                .filter(|(comment, _)| comment.spans_row(cursor.row)),
        ) {
            return Some(CommentResolution::AtCursor(comment.clone()));
        }

        let (comment, node) =
            last_comment(comments.iter().filter(|(comment, _)| comment.end.row < cursor.row))?;

        let parent = node.parent()?;
        if cursor.row < parent.start_position().row || cursor.row > parent.end_position().row {
            debug!("CommentResolver: Cursor is outside the comment's enclosing node");
            return None;
        }

        let mut walker = parent.walk();
        let intervening = parent.children(&mut walker).any(|child| {
            let row = child.start_position().row;
            row > comment.end.row && row <= cursor.row
        });
        if intervening {
            debug!("CommentResolver: Code between comment and cursor");
            return None;
        }

        Some(CommentResolution::AboveCursor(comment.clone()))
    }

    /// Number of distinct source lines covered by comments
    pub fn get_total_comment_lines(&self, document: &ParsedDocument) -> usize {
        let rows: BTreeSet<usize> = self
            .captured_comments(document)
            .iter()
            .flat_map(|(comment, _)| comment.start.row..=comment.end.row)
            .collect();
        rows.len()
    }

    /// Whether a comment is only decoration (`//`, `# --`, `/* */`)
    pub fn is_comment_empty(comment: &Comment) -> bool {
        Self::is_comment_empty_with_limit(comment, DEFAULT_EMPTY_COMMENT_MAX_ALPHANUMERICS)
    }

    pub fn is_comment_empty_with_limit(comment: &Comment, max_alphanumerics: usize) -> bool {
        let alphanumerics = comment
            .content
            .trim()
            .chars()
            .filter(|c| !matches!(c, '\n' | '\r' | '\\'))
            .filter(char::is_ascii_alphanumeric)
            .count();
        alphanumerics <= max_alphanumerics
    }
}

/// Greatest end row wins; ties keep the earliest comment
fn last_comment<'a, 't: 'a>(
    comments: impl Iterator<Item = &'a (Comment, Node<'t>)>,
) -> Option<&'a (Comment, Node<'t>)> {
    comments.fold(None, |best, candidate| match best {
        Some(current) if candidate.0.end.row <= current.0.end.row => Some(current),
        _ => Some(candidate),
    })
}
