use docforge_domain::{BlockNode, InlineNode, MarkSet};

use super::logo::LogoPlacement;
use super::parts::{BULLET_NUM_ID, LOGO_RELATIONSHIP_ID, ORDERED_NUM_ID};
use super::{HEADING_BASE_HALF_POINTS, PARAGRAPH_LINE_SPACING, PARAGRAPH_SPACING_AFTER, escape_xml};

const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, Copy)]
enum RunStyle {
    /// Marks from the source leaves.
    Marks,
    /// Bold at a fixed size; source marks are ignored.
    Heading { size_half_points: u32 },
}

/// Accumulates the `w:body` children of `word/document.xml`.
pub(super) struct BodyWriter {
    xml: String,
}

impl BodyWriter {
    pub(super) fn new() -> Self {
        Self { xml: String::new() }
    }

    pub(super) fn finish(self) -> String {
        self.xml
    }

    pub(super) fn logo_paragraph(&mut self, placement: &LogoPlacement<'_>) {
        let extension = placement.format.extension();
        let (cx, cy) = (placement.width_emu, placement.height_emu);

        self.open_paragraph(None, Some("right"));
        self.xml.push_str(&format!(
            r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="1" name="Logo"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="logo.{extension}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{LOGO_RELATIONSHIP_ID}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#
        ));
        self.xml.push_str("</w:p>");
    }

    pub(super) fn blocks(&mut self, blocks: &[BlockNode]) {
        for block in blocks {
            self.block(block, None);
        }
    }

    fn block(&mut self, block: &BlockNode, num_id: Option<u32>) {
        match block {
            BlockNode::Paragraph { content } => {
                self.paragraph(num_id, content, RunStyle::Marks);
            }
            BlockNode::Heading { attrs, content } => {
                let size_half_points = heading_size(attrs.level);
                self.paragraph(num_id, content, RunStyle::Heading { size_half_points });
            }
            BlockNode::BulletList { content } => self.list(content, BULLET_NUM_ID),
            BlockNode::OrderedList { content } => self.list(content, ORDERED_NUM_ID),
            BlockNode::ListItem { content } => {
                for child in content {
                    self.block(child, num_id);
                }
            }
            BlockNode::Unsupported => {}
        }
    }

    fn list(&mut self, items: &[BlockNode], num_id: u32) {
        for item in items {
            self.block(item, Some(num_id));
        }
    }

    fn paragraph(&mut self, num_id: Option<u32>, content: &[InlineNode], style: RunStyle) {
        self.open_paragraph(num_id, None);
        for node in content {
            match node {
                InlineNode::Text { text, marks } => {
                    if !text.is_empty() {
                        self.text_run(text, MarkSet::from_marks(marks), style);
                    }
                }
                InlineNode::HardBreak => self.xml.push_str("<w:r><w:br/></w:r>"),
                InlineNode::Unsupported => {}
            }
        }
        self.xml.push_str("</w:p>");
    }

    fn open_paragraph(&mut self, num_id: Option<u32>, justification: Option<&str>) {
        self.xml.push_str("<w:p><w:pPr>");
        if let Some(num_id) = num_id {
            self.xml.push_str(&format!(
                r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="{num_id}"/></w:numPr>"#
            ));
        }
        self.xml.push_str(&format!(
            r#"<w:spacing w:after="{PARAGRAPH_SPACING_AFTER}" w:line="{PARAGRAPH_LINE_SPACING}" w:lineRule="auto"/>"#
        ));
        if let Some(justification) = justification {
            self.xml
                .push_str(&format!(r#"<w:jc w:val="{justification}"/>"#));
        }
        self.xml.push_str("</w:pPr>");
    }

    fn text_run(&mut self, text: &str, marks: MarkSet, style: RunStyle) {
        let mut properties = String::new();
        match style {
            RunStyle::Marks => {
                if marks.bold {
                    properties.push_str("<w:b/>");
                }
                if marks.italic {
                    properties.push_str("<w:i/>");
                }
                if marks.underline {
                    properties.push_str(r#"<w:u w:val="single"/>"#);
                }
            }
            RunStyle::Heading { size_half_points } => {
                properties.push_str(&format!(
                    r#"<w:b/><w:sz w:val="{size_half_points}"/><w:szCs w:val="{size_half_points}"/>"#
                ));
            }
        }

        self.xml.push_str("<w:r>");
        if !properties.is_empty() {
            self.xml.push_str("<w:rPr>");
            self.xml.push_str(&properties);
            self.xml.push_str("</w:rPr>");
        }
        // Line feeds inside a leaf become breaks within the same run.
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.xml.push_str("<w:br/>");
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            if !line.is_empty() {
                self.xml.push_str(&format!(
                    r#"<w:t xml:space="preserve">{}</w:t>"#,
                    escape_xml(line)
                ));
            }
        }
        self.xml.push_str("</w:r>");
    }
}

/// Heading run size in half-points. Levels are clamped to 1..=6, as in the preview.
pub(super) fn heading_size(level: u8) -> u32 {
    HEADING_BASE_HALF_POINTS - 2 * u32::from(level.clamp(1, MAX_HEADING_LEVEL))
}
