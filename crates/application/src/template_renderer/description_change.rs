use docforge_domain::{DocumentAst, InlineNode, Mark};

use super::letter::{LetterBody, LetterFields, compose, detail};

pub(super) fn render(fields: &LetterFields<'_>) -> DocumentAst {
    let paragraphs = vec![
        vec![InlineNode::text(format!(
            "{} requests a modification to revise the catalog description of the \
             product listed below. Pricing is not affected by this change.",
            fields.value("contractorName")
        ))],
        vec![
            InlineNode::bold("Reason for change: "),
            InlineNode::styled(fields.value("changeReason"), vec![Mark::Italic]),
        ],
    ];

    compose(
        fields,
        LetterBody {
            subject: "Request for Product Description Change",
            paragraphs,
            details_intro: "Description change:",
            details: vec![
                detail("Product Name", fields.value("productName")),
                detail(
                    "Manufacturer Part Number",
                    fields.value("manufacturerPartNumber"),
                ),
                detail("Current Description", fields.value("currentDescription")),
                detail("Revised Description", fields.value("revisedDescription")),
            ],
        },
    )
}
