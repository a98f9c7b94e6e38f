use docforge_domain::{DocumentAst, InlineNode};

use super::letter::{LetterBody, LetterFields, compose, detail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Up,
    Down,
}

pub(super) fn render(fields: &LetterFields<'_>, direction: Direction) -> DocumentAst {
    let (subject, opening) = match direction {
        Direction::Up => (
            "Request for Economic Price Adjustment (Increase)",
            "requests an economic price adjustment increasing the GSA price of the product \
             listed below",
        ),
        Direction::Down => (
            "Notice of Price Reduction",
            "hereby notifies the Contracting Officer of a price reduction for the product \
             listed below",
        ),
    };

    let mut paragraphs = vec![vec![InlineNode::text(format!(
        "{} {}, effective {}.",
        fields.value("contractorName"),
        opening,
        fields.date("effectiveDate")
    ))]];

    if fields.has("justification") {
        paragraphs.push(vec![
            InlineNode::bold("Justification: "),
            InlineNode::text(fields.value("justification")),
        ]);
    }

    let mut details = vec![
        detail("Product Name", fields.value("productName")),
        detail(
            "Manufacturer Part Number",
            fields.value("manufacturerPartNumber"),
        ),
        detail("Current GSA Price", fields.currency("currentPrice")),
        detail("Proposed GSA Price", fields.currency("proposedPrice")),
        detail("Percentage Change", fields.percentage("percentageChange")),
    ];

    if direction == Direction::Down {
        details.push(detail(
            "Commercial Price",
            fields.currency("commercialPrice"),
        ));
    }

    compose(
        fields,
        LetterBody {
            subject,
            paragraphs,
            details_intro: "Pricing details:",
            details,
        },
    )
}
