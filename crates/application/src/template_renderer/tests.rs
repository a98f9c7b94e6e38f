use chrono::NaiveDate;
use docforge_domain::{BlockNode, FormDataMap, FormValue, InlineNode};

use crate::document_ports::LogoSizing;

use super::TemplateKind;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_else(|| unreachable!())
}

fn sample_data() -> FormDataMap {
    let mut data = FormDataMap::new();
    data.set("contractNumber", FormValue::from("GS-35F-0119Y"));
    data.set("contractorName", FormValue::from("Acme Federal LLC"));
    data.set("contractingOfficer", FormValue::from("Jordan Lee"));
    data.set("productName", FormValue::from("Rugged Laptop"));
    data.set("proposedPrice", FormValue::Number(1899.0));
    data.set("currentPrice", FormValue::from("$1,799.00"));
    data.set("effectiveDate", FormValue::from("2026-12-01"));
    data
}

#[test]
fn resolves_every_registered_document_type() {
    for kind in TemplateKind::ALL {
        let resolved = TemplateKind::resolve(kind.document_type_id());
        assert_eq!(resolved.ok(), Some(kind));
    }
    assert!(TemplateKind::resolve("unknown").is_err());
}

#[test]
fn price_letters_use_proportional_logo() {
    assert_eq!(
        TemplateKind::PriceIncrease.logo_sizing(),
        LogoSizing::ProportionalHeight { height_pt: 70 }
    );
    assert_eq!(
        TemplateKind::ProductAddition.logo_sizing(),
        LogoSizing::FixedBox {
            width_px: 120,
            height_px: 60
        }
    );
}

#[test]
fn letter_frame_interpolates_values() {
    let rendered = TemplateKind::ProductAddition.render_on(&sample_data(), today());
    let blocks = rendered.body.content();

    assert_eq!(
        blocks[0],
        BlockNode::paragraph(vec![InlineNode::text("October 18, 2026")])
    );
    assert_eq!(
        blocks[2],
        BlockNode::heading(
            2,
            vec![InlineNode::text(
                "RE: Request for Product Addition, Contract No. GS-35F-0119Y"
            )]
        )
    );
    assert!(
        blocks
            .iter()
            .any(|block| matches!(block, BlockNode::OrderedList { content } if content.len() == 7))
    );

    let text = rendered.body.plain_text();
    assert!(text.contains("Dear Jordan Lee:"));
    assert!(text.contains("Proposed GSA Price: $1,899.00"));
    assert!(text.contains("Country of Origin: ________"));
    assert_eq!(rendered.file_stem, "Product_Addition_GS-35F-0119Y");
}

#[test]
fn price_increase_formats_prices_and_effective_date() {
    let rendered = TemplateKind::PriceIncrease.render_on(&sample_data(), today());
    let text = rendered.body.plain_text();

    assert!(text.contains("effective December 1, 2026."));
    assert!(text.contains("Current GSA Price: $1,799.00"));
    assert!(!text.contains("Commercial Price"));

    let decrease = TemplateKind::PriceDecrease
        .render_on(&sample_data(), today())
        .body
        .plain_text();
    assert!(decrease.contains("Commercial Price: ________"));
}

#[test]
fn optional_paragraphs_follow_entered_values() {
    let mut data = sample_data();
    let without = TemplateKind::ProductDeletion.render_on(&data, today());

    data.set("replacementPartNumber", FormValue::from("LT-200"));
    let with = TemplateKind::ProductDeletion.render_on(&data, today());

    assert_eq!(with.body.content().len(), without.body.content().len() + 1);
    assert!(with.body.plain_text().contains("Replacement Part Number: LT-200"));
}

#[test]
fn modification_date_overrides_today() {
    let mut data = sample_data();
    data.set("modificationDate", FormValue::from("2026-09-30"));
    let rendered = TemplateKind::DescriptionChange.render_on(&data, today());
    assert_eq!(
        rendered.body.content()[0],
        BlockNode::paragraph(vec![InlineNode::text("September 30, 2026")])
    );
}

#[test]
fn multi_line_address_keeps_its_line_breaks() {
    let mut data = sample_data();
    data.set(
        "contractorAddress",
        FormValue::from("123 Main St\nSpringfield, VA"),
    );
    let rendered = TemplateKind::ProductAddition.render_on(&data, today());

    let signature = rendered
        .body
        .content()
        .iter()
        .rev()
        .find_map(|block| match block {
            BlockNode::Paragraph { content } => Some(content),
            _ => None,
        })
        .unwrap_or_else(|| unreachable!());

    assert!(signature.contains(&InlineNode::text("123 Main St")));
    assert!(signature.contains(&InlineNode::text("Springfield, VA")));
    assert!(!signature.iter().any(|node| matches!(
        node,
        InlineNode::Text { text, .. } if text.contains('\n')
    )));
}
