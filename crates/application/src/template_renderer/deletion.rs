use docforge_domain::{DocumentAst, InlineNode};

use super::letter::{LetterBody, LetterFields, compose, detail};

pub(super) fn render(fields: &LetterFields<'_>) -> DocumentAst {
    let mut paragraphs = vec![vec![InlineNode::text(format!(
        "{} requests a modification to delete the following product from the \
         above-referenced contract, effective {}.",
        fields.value("contractorName"),
        fields.date("effectiveDate")
    ))]];

    let mut details = vec![
        detail("Product Name", fields.value("productName")),
        detail(
            "Manufacturer Part Number",
            fields.value("manufacturerPartNumber"),
        ),
        detail("Reason for Deletion", fields.value("deletionReason")),
    ];

    if fields.has("replacementPartNumber") {
        details.push(detail(
            "Replacement Part Number",
            fields.value("replacementPartNumber"),
        ));
        paragraphs.push(vec![InlineNode::text(
            "A replacement product is offered under a separate addition request.",
        )]);
    }

    compose(
        fields,
        LetterBody {
            subject: "Request for Product Deletion",
            paragraphs,
            details_intro: "Product to be deleted:",
            details,
        },
    )
}
