//! Empty-Body Resolver: detects a cursor inside an empty function, class or
//! lambda body.

use serde::{Deserialize, Serialize};
use tracing::debug;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

use crate::tree_sitter::{LanguageName, ParsedDocument, Point, QueryCache, QueryKind};

/// Whitespace-only interior between a body's opening and closing delimiters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyBodyRegion {
    pub start: Point,
    pub end: Point,
}

impl EmptyBodyRegion {
    /// Interior of a captured body: from the end of the token before the last
    /// child to the start of the last child. `None` for nodes without two
    /// children to anchor on.
    pub fn of_node(node: Node<'_>) -> Option<Self> {
        let closing = node.child(node.child_count().checked_sub(1)?)?;
        let opening = closing.prev_sibling()?;
        Some(Self {
            start: opening.end_position().into(),
            end: closing.start_position().into(),
        })
    }

    /// Row-major containment, inclusive at both ends
    pub fn contains(&self, cursor: Point) -> bool {
        let after_start = cursor.row > self.start.row
            || (cursor.row == self.start.row && cursor.column >= self.start.column);
        let before_end = cursor.row < self.end.row
            || (cursor.row == self.end.row && cursor.column <= self.end.column);
        after_start && before_end
    }
}

/// Cursor sits on the row below `end`, or on the same row past it
pub fn is_cursor_right_after(cursor: Point, end: Point) -> bool {
    cursor.row.checked_sub(end.row) == Some(1)
        || (cursor.row == end.row && cursor.column > end.column)
}

#[derive(Debug)]
pub struct EmptyFunctionResolver {
    queries: QueryCache,
    python_definitions: QueryCache,
}

impl Default for EmptyFunctionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptyFunctionResolver {
    pub fn new() -> Self {
        Self {
            queries: QueryCache::new(QueryKind::EmptyFunction),
            python_definitions: QueryCache::new(QueryKind::PythonDefinitions),
        }
    }

    /// Empty-body regions found in the document
    pub fn empty_body_regions(&self, document: &ParsedDocument) -> Vec<EmptyBodyRegion> {
        let language = document.language_name();
        let Some(query) = self.queries.get(language, &document.language) else {
            debug!(%language, "EmptyFunctionResolver: No empty function query for language");
            return Vec::new();
        };

        captured_nodes(query, document)
            .into_iter()
            .filter_map(EmptyBodyRegion::of_node)
            .collect()
    }

    pub fn is_cursor_in_empty_function(&self, document: &ParsedDocument, cursor: Point) -> bool {
        let in_empty_body = self
            .empty_body_regions(document)
            .iter()
            .any(|region| region.contains(cursor));

        in_empty_body || self.is_cursor_after_empty_python_function(document, cursor)
    }

    /// A `def`/`class` with no body yet, with the cursor right after it.
    ///
    /// Indentation is not checked: a statement directly below a body-less
    /// definition also counts.
    pub fn is_cursor_after_empty_python_function(
        &self,
        document: &ParsedDocument,
        cursor: Point,
    ) -> bool {
        if document.language_name() != LanguageName::Python {
            return false;
        }
        let Some(query) = self
            .python_definitions
            .get(LanguageName::Python, &document.language)
        else {
            return false;
        };

        captured_nodes(query, document).into_iter().any(|definition| {
            let body_is_empty = definition
                .child_by_field_name("body")
                .is_some_and(|body| body.child_count() == 0);
            body_is_empty && is_cursor_right_after(cursor, definition.end_position().into())
        })
    }
}

fn captured_nodes<'t>(query: &Query, document: &'t ParsedDocument) -> Vec<Node<'t>> {
    let tree = &document.tree;
    let mut cursor = QueryCursor::new();
    let mut captures = cursor.captures(query, tree.root_node(), tree.source().as_bytes());

    let mut nodes = Vec::new();
    while let Some((query_match, index)) = captures.next() {
        nodes.push(query_match.captures[*index].node);
    }
    nodes
}
