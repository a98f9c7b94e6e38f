use docforge_domain::{BlockNode, DocumentAst, InlineNode, MarkSet};

/// Renders a document tree as the static HTML fragment shown in preview.
#[must_use]
pub fn render_html(document: &DocumentAst) -> String {
    let mut html = String::new();
    for block in document.content() {
        push_block(&mut html, block);
    }
    html
}

fn push_block(html: &mut String, block: &BlockNode) {
    match block {
        BlockNode::Paragraph { content } => {
            html.push_str("<p>");
            push_inlines(html, content);
            html.push_str("</p>");
        }
        BlockNode::Heading { attrs, content } => {
            let level = attrs.level.clamp(1, 6);
            html.push_str(&format!("<h{level}>"));
            push_inlines(html, content);
            html.push_str(&format!("</h{level}>"));
        }
        BlockNode::BulletList { content } => {
            html.push_str("<ul>");
            push_children(html, content);
            html.push_str("</ul>");
        }
        BlockNode::OrderedList { content } => {
            html.push_str("<ol type=\"a\">");
            push_children(html, content);
            html.push_str("</ol>");
        }
        BlockNode::ListItem { content } => {
            html.push_str("<li>");
            push_children(html, content);
            html.push_str("</li>");
        }
        BlockNode::Unsupported => {}
    }
}

fn push_children(html: &mut String, children: &[BlockNode]) {
    for child in children {
        push_block(html, child);
    }
}

fn push_inlines(html: &mut String, content: &[InlineNode]) {
    for node in content {
        match node {
            InlineNode::Text { text, marks } => {
                let marks = MarkSet::from_marks(marks);
                if marks.bold {
                    html.push_str("<strong>");
                }
                if marks.italic {
                    html.push_str("<em>");
                }
                if marks.underline {
                    html.push_str("<u>");
                }
                for (index, line) in text.split('\n').enumerate() {
                    if index > 0 {
                        html.push_str("<br>");
                    }
                    html.push_str(&escape_html(line.strip_suffix('\r').unwrap_or(line)));
                }
                if marks.underline {
                    html.push_str("</u>");
                }
                if marks.italic {
                    html.push_str("</em>");
                }
                if marks.bold {
                    html.push_str("</strong>");
                }
            }
            InlineNode::HardBreak => html.push_str("<br>"),
            InlineNode::Unsupported => {}
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use docforge_domain::{BlockNode, DocumentAst, InlineNode, Mark};

    use super::render_html;

    #[test]
    fn renders_blocks_marks_and_breaks() {
        let document = DocumentAst::new(vec![
            BlockNode::heading(2, vec![InlineNode::text("RE: Contract")]),
            BlockNode::paragraph(vec![
                InlineNode::styled("Dear", vec![Mark::Bold, Mark::Italic]),
                InlineNode::HardBreak,
                InlineNode::text("Sir"),
            ]),
            BlockNode::ordered_list(vec![vec![InlineNode::text("one")]]),
            BlockNode::Unsupported,
        ]);

        assert_eq!(
            render_html(&document),
            "<h2>RE: Contract</h2>\
             <p><strong><em>Dear</em></strong><br>Sir</p>\
             <ol type=\"a\"><li><p>one</p></li></ol>"
        );
    }

    #[test]
    fn escapes_interpolated_values() {
        let document = DocumentAst::new(vec![BlockNode::paragraph(vec![InlineNode::text(
            "Smith & <Sons>",
        )])]);
        assert_eq!(render_html(&document), "<p>Smith &amp; &lt;Sons&gt;</p>");
    }

    #[test]
    fn line_feeds_render_as_breaks() {
        let document = DocumentAst::new(vec![BlockNode::paragraph(vec![InlineNode::text(
            "123 Main St\nSpringfield, VA",
        )])]);

        assert_eq!(render_html(&document), "<p>123 Main St<br>Springfield, VA</p>");
    }
}
