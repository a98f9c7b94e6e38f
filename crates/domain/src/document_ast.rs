use serde::{Deserialize, Serialize};

/// Inline formatting mark applied to a text leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    /// Bold weight.
    Bold,
    /// Italic style.
    Italic,
    /// Single underline.
    Underline,
    /// Mark emitted by the editor that export does not map.
    #[serde(other)]
    Unsupported,
}

/// Resolved mark flags of one text leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkSet {
    /// Bold flag.
    pub bold: bool,
    /// Italic flag.
    pub italic: bool,
    /// Underline flag.
    pub underline: bool,
}

impl MarkSet {
    /// Collapses a mark list into flags.
    #[must_use]
    pub fn from_marks(marks: &[Mark]) -> Self {
        marks.iter().fold(Self::default(), |mut set, mark| {
            match mark {
                Mark::Bold => set.bold = true,
                Mark::Italic => set.italic = true,
                Mark::Underline => set.underline = true,
                Mark::Unsupported => {}
            }
            set
        })
    }
}

/// Leaf content of a paragraph or heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineNode {
    /// Text run.
    Text {
        /// Literal text.
        text: String,
        /// Formatting marks.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    /// Line break inside the same block.
    HardBreak,
    /// Inline node the export does not understand.
    #[serde(other)]
    Unsupported,
}

impl InlineNode {
    /// Creates an unformatted text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Creates a text leaf with marks.
    #[must_use]
    pub fn styled(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text {
            text: text.into(),
            marks,
        }
    }

    /// Creates a bold text leaf.
    #[must_use]
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(text, vec![Mark::Bold])
    }
}

/// Attributes of a heading block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    /// Heading level, 1 being the most prominent.
    pub level: u8,
}

impl Default for HeadingAttrs {
    fn default() -> Self {
        Self { level: 1 }
    }
}

/// Block-level node of the rich-text document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockNode {
    /// Plain paragraph.
    Paragraph {
        /// Inline content.
        #[serde(default)]
        content: Vec<InlineNode>,
    },
    /// Heading paragraph.
    Heading {
        /// Heading attributes.
        #[serde(default)]
        attrs: HeadingAttrs,
        /// Inline content.
        #[serde(default)]
        content: Vec<InlineNode>,
    },
    /// Unordered list of list items.
    BulletList {
        /// List items.
        #[serde(default)]
        content: Vec<BlockNode>,
    },
    /// Ordered list of list items.
    OrderedList {
        /// List items.
        #[serde(default)]
        content: Vec<BlockNode>,
    },
    /// One list entry holding block content.
    ListItem {
        /// Item content, usually one paragraph.
        #[serde(default)]
        content: Vec<BlockNode>,
    },
    /// Block node the export does not understand.
    #[serde(other)]
    Unsupported,
}

impl BlockNode {
    /// Creates a paragraph.
    #[must_use]
    pub fn paragraph(content: Vec<InlineNode>) -> Self {
        Self::Paragraph { content }
    }

    /// Creates a heading.
    #[must_use]
    pub fn heading(level: u8, content: Vec<InlineNode>) -> Self {
        Self::Heading {
            attrs: HeadingAttrs { level },
            content,
        }
    }

    /// Creates a bullet list with one paragraph per item.
    #[must_use]
    pub fn bullet_list(items: Vec<Vec<InlineNode>>) -> Self {
        Self::BulletList {
            content: items.into_iter().map(Self::list_item).collect(),
        }
    }

    /// Creates an ordered list with one paragraph per item.
    #[must_use]
    pub fn ordered_list(items: Vec<Vec<InlineNode>>) -> Self {
        Self::OrderedList {
            content: items.into_iter().map(Self::list_item).collect(),
        }
    }

    fn list_item(content: Vec<InlineNode>) -> Self {
        Self::ListItem {
            content: vec![Self::paragraph(content)],
        }
    }

    fn collect_text(&self, lines: &mut Vec<String>) {
        match self {
            Self::Paragraph { content } | Self::Heading { content, .. } => {
                let line = content
                    .iter()
                    .map(|node| match node {
                        InlineNode::Text { text, .. } => text.as_str(),
                        InlineNode::HardBreak => "\n",
                        InlineNode::Unsupported => "",
                    })
                    .collect::<String>();
                lines.push(line);
            }
            Self::BulletList { content }
            | Self::OrderedList { content }
            | Self::ListItem { content } => {
                for node in content {
                    node.collect_text(lines);
                }
            }
            Self::Unsupported => {}
        }
    }
}

/// Rich-text document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAst {
    #[serde(default)]
    content: Vec<BlockNode>,
}

impl DocumentAst {
    /// Creates a document from top-level blocks.
    #[must_use]
    pub fn new(content: Vec<BlockNode>) -> Self {
        Self { content }
    }

    /// Returns top-level blocks.
    #[must_use]
    pub fn content(&self) -> &[BlockNode] {
        &self.content
    }

    /// Appends a top-level block.
    pub fn push(&mut self, block: BlockNode) {
        self.content.push(block);
    }

    /// Returns whether the document has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the text of every paragraph-like block, one line per block.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.content {
            block.collect_text(&mut lines);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BlockNode, DocumentAst, InlineNode, Mark, MarkSet};

    #[test]
    fn parses_editor_json_and_tolerates_unknown_nodes() {
        let payload = json!({
            "type": "doc",
            "content": [
                { "type": "heading", "attrs": { "level": 2, "textAlign": "left" },
                  "content": [{ "type": "text", "text": "Subject" }] },
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "Hello", "marks": [{ "type": "bold" }, { "type": "link", "attrs": { "href": "x" } }] },
                    { "type": "hardBreak" },
                    { "type": "mention", "attrs": { "id": "1" } }
                ] },
                { "type": "table", "content": [] },
                { "type": "orderedList", "attrs": { "start": 1 }, "content": [
                    { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "one" }] }] }
                ] }
            ]
        });

        let ast: DocumentAst = serde_json::from_value(payload).unwrap_or_else(|_| unreachable!());

        assert_eq!(ast.content().len(), 4);
        assert_eq!(ast.content()[0], BlockNode::heading(2, vec![InlineNode::text("Subject")]));
        assert_eq!(ast.content()[2], BlockNode::Unsupported);
        assert_eq!(
            ast.content()[1],
            BlockNode::paragraph(vec![
                InlineNode::styled("Hello", vec![Mark::Bold, Mark::Unsupported]),
                InlineNode::HardBreak,
                InlineNode::Unsupported,
            ])
        );
        assert_eq!(ast.content()[3], BlockNode::ordered_list(vec![vec![InlineNode::text("one")]]));
    }

    #[test]
    fn mark_set_ignores_unsupported_marks() {
        let set = MarkSet::from_marks(&[Mark::Italic, Mark::Unsupported, Mark::Underline]);
        assert_eq!(
            set,
            MarkSet {
                bold: false,
                italic: true,
                underline: true
            }
        );
    }

    #[test]
    fn plain_text_flattens_lists() {
        let ast = DocumentAst::new(vec![
            BlockNode::paragraph(vec![InlineNode::text("Intro")]),
            BlockNode::bullet_list(vec![
                vec![InlineNode::text("first")],
                vec![InlineNode::bold("second")],
            ]),
        ]);
        assert_eq!(ast.plain_text(), "Intro\nfirst\nsecond");
    }
}
