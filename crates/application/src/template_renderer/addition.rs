use docforge_domain::{DocumentAst, InlineNode};

use super::letter::{LetterBody, LetterFields, compose, detail};

pub(super) fn render(fields: &LetterFields<'_>) -> DocumentAst {
    let mut paragraphs = vec![vec![InlineNode::text(format!(
        "{} respectfully requests a modification to add the following product to the \
         above-referenced Multiple Award Schedule contract.",
        fields.value("contractorName")
    ))]];

    if fields.has("justification") {
        paragraphs.push(vec![
            InlineNode::bold("Justification: "),
            InlineNode::text(fields.value("justification")),
        ]);
    }

    compose(
        fields,
        LetterBody {
            subject: "Request for Product Addition",
            paragraphs,
            details_intro: "Product details:",
            details: vec![
                detail("Product Name", fields.value("productName")),
                detail(
                    "Manufacturer Part Number",
                    fields.value("manufacturerPartNumber"),
                ),
                detail("Description", fields.value("productDescription")),
                detail("Commercial Price", fields.currency("commercialPrice")),
                detail("Proposed GSA Price", fields.currency("proposedPrice")),
                detail("Discount", fields.percentage("discountPercentage")),
                detail("Country of Origin", fields.value("countryOfOrigin")),
            ],
        },
    )
}
