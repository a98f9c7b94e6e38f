use async_trait::async_trait;
use docforge_application::DocumentConfigSource;
use docforge_core::{AppError, AppResult};
use docforge_domain::{
    DocumentConfig, DocumentTypeRegistry, DocumentTypeSummary, FieldBehavior, FieldKind,
    FieldSchema, SelectOption, ValidationRule,
};

const CONTRACT_SECTION: &str = "Contract Information";
const PRODUCT_SECTION: &str = "Product Details";
const PRICING_SECTION: &str = "Pricing";
const CONTACT_SECTION: &str = "Contractor Contact";

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PHONE_PATTERN: &str = r"^\+?[0-9 ().-]{7,20}$";
const CONTRACT_PATTERN: &str = r"^[A-Z0-9]{2,4}-[A-Z0-9]{2,4}-[A-Z0-9]{3,8}$";

/// Config source serving the five built-in modification letter types.
#[derive(Debug, Clone)]
pub struct BuiltinDocumentCatalog {
    registry: DocumentTypeRegistry,
    configs: Vec<DocumentConfig>,
}

impl BuiltinDocumentCatalog {
    /// Builds the catalog.
    pub fn new() -> AppResult<Self> {
        let configs = vec![
            addition_config()?,
            deletion_config()?,
            description_change_config()?,
            price_change_config("price-increase", "Price Increase", "trending-up")?,
            price_change_config("price-decrease", "Price Decrease", "trending-down")?,
        ];
        let registry = DocumentTypeRegistry::new(
            configs
                .iter()
                .map(|config| DocumentTypeSummary::new(config.id(), config.name(), config.icon()))
                .collect::<AppResult<Vec<_>>>()?,
        )?;

        Ok(Self { registry, configs })
    }
}

#[async_trait]
impl DocumentConfigSource for BuiltinDocumentCatalog {
    async fn list_document_types(&self) -> AppResult<Vec<DocumentTypeSummary>> {
        Ok(self.registry.entries().to_vec())
    }

    async fn load_config(
        &self,
        document_type_id: &str,
        _job_id: Option<&str>,
    ) -> AppResult<DocumentConfig> {
        self.configs
            .iter()
            .find(|config| config.id() == document_type_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("document type '{document_type_id}' does not exist"))
            })
    }
}

fn field(id: &str, label: &str, kind: FieldKind, section: &str) -> AppResult<FieldSchema> {
    Ok(FieldSchema::new(id, label, kind)?.with_section(section))
}

fn required(id: &str, label: &str, kind: FieldKind, section: &str) -> AppResult<FieldSchema> {
    Ok(field(id, label, kind, section)?
        .with_rule(ValidationRule::required(format!("{label} is required"))))
}

fn contract_fields() -> AppResult<Vec<FieldSchema>> {
    Ok(vec![
        required(
            "contractNumber",
            "Contract Number",
            FieldKind::Text,
            CONTRACT_SECTION,
        )?
        .with_placeholder("GS-35F-0119Y")
        .with_rule(ValidationRule::regex(
            CONTRACT_PATTERN,
            "Contract number must look like GS-35F-0119Y",
        )),
        required(
            "contractorName",
            "Contractor Name",
            FieldKind::Text,
            CONTRACT_SECTION,
        )?
        .with_behavior(FieldBehavior::Manual),
        field(
            "modificationDate",
            "Letter Date",
            FieldKind::Date,
            CONTRACT_SECTION,
        )?,
        required(
            "contractingOfficer",
            "Contracting Officer",
            FieldKind::Text,
            CONTRACT_SECTION,
        )?,
        field(
            "contractingOfficerEmail",
            "Contracting Officer Email",
            FieldKind::Email,
            CONTRACT_SECTION,
        )?
        .with_rule(ValidationRule::regex(
            EMAIL_PATTERN,
            "Enter a valid email address",
        )),
    ])
}

fn contact_fields() -> AppResult<Vec<FieldSchema>> {
    Ok(vec![
        required("contactName", "Contact Name", FieldKind::Text, CONTACT_SECTION)?,
        field("contactTitle", "Contact Title", FieldKind::Text, CONTACT_SECTION)?,
        required(
            "contactPhone",
            "Contact Phone",
            FieldKind::Phone,
            CONTACT_SECTION,
        )?
        .with_placeholder("(555) 010-0000")
        .with_rule(ValidationRule::regex(
            PHONE_PATTERN,
            "Enter a valid phone number",
        )),
        required(
            "contactEmail",
            "Contact Email",
            FieldKind::Email,
            CONTACT_SECTION,
        )?
        .with_rule(ValidationRule::regex(
            EMAIL_PATTERN,
            "Enter a valid email address",
        )),
        field(
            "contractorAddress",
            "Contractor Address",
            FieldKind::Textarea,
            CONTACT_SECTION,
        )?
        .with_rule(ValidationRule::max_length(
            300,
            "Address must be 300 characters or fewer",
        )),
    ])
}

fn product_identity_fields() -> AppResult<Vec<FieldSchema>> {
    Ok(vec![
        required("productName", "Product Name", FieldKind::Text, PRODUCT_SECTION)?,
        required(
            "manufacturerPartNumber",
            "Manufacturer Part Number",
            FieldKind::Text,
            PRODUCT_SECTION,
        )?
        .with_rule(ValidationRule::max_length(
            40,
            "Part number must be 40 characters or fewer",
        )),
    ])
}

fn price(id: &str, label: &str) -> AppResult<FieldSchema> {
    Ok(required(id, label, FieldKind::Currency, PRICING_SECTION)?
        .with_placeholder("$0.00")
        .with_rule(ValidationRule::range(
            Some(0.01),
            None,
            format!("{label} must be greater than zero"),
        )))
}

fn percentage(id: &str, label: &str) -> AppResult<FieldSchema> {
    Ok(field(id, label, FieldKind::Percentage, PRICING_SECTION)?.with_rule(
        ValidationRule::range(
            Some(0.0),
            Some(100.0),
            format!("{label} must be between 0 and 100"),
        ),
    ))
}

fn assemble(
    id: &str,
    name: &str,
    icon: &str,
    groups: Vec<Vec<FieldSchema>>,
) -> AppResult<DocumentConfig> {
    DocumentConfig::new(id, name, icon, groups.into_iter().flatten().collect())
}

fn addition_config() -> AppResult<DocumentConfig> {
    let mut product = product_identity_fields()?;
    product.push(
        required(
            "productDescription",
            "Product Description",
            FieldKind::Textarea,
            PRODUCT_SECTION,
        )?
        .with_rule(ValidationRule::max_length(
            500,
            "Description must be 500 characters or fewer",
        )),
    );
    product.push(
        required(
            "countryOfOrigin",
            "Country of Origin",
            FieldKind::Select,
            PRODUCT_SECTION,
        )?
        .with_behavior(FieldBehavior::Manual)
        .with_options(vec![
            SelectOption::new("United States", "United States"),
            SelectOption::new("Canada", "Canada"),
            SelectOption::new("Mexico", "Mexico"),
            SelectOption::new("Germany", "Germany"),
            SelectOption::new("Japan", "Japan"),
        ]),
    );
    product.push(field(
        "justification",
        "Justification",
        FieldKind::Textarea,
        PRODUCT_SECTION,
    )?);

    assemble(
        "addition",
        "Product Addition",
        "plus-circle",
        vec![
            contract_fields()?,
            product,
            vec![
                price("commercialPrice", "Commercial Price")?,
                price("proposedPrice", "Proposed GSA Price")?,
                percentage("discountPercentage", "Discount")?,
            ],
            contact_fields()?,
        ],
    )
}

fn deletion_config() -> AppResult<DocumentConfig> {
    let mut product = product_identity_fields()?;
    product.push(
        required(
            "deletionReason",
            "Reason for Deletion",
            FieldKind::Select,
            PRODUCT_SECTION,
        )?
        .with_options(vec![
            SelectOption::new("Discontinued by manufacturer", "Discontinued by manufacturer"),
            SelectOption::new("Replaced by newer model", "Replaced by newer model"),
            SelectOption::new("No longer offered commercially", "No longer offered commercially"),
        ]),
    );
    product.push(field(
        "replacementPartNumber",
        "Replacement Part Number",
        FieldKind::Text,
        PRODUCT_SECTION,
    )?);
    product.push(required(
        "effectiveDate",
        "Effective Date",
        FieldKind::Date,
        PRODUCT_SECTION,
    )?);

    assemble(
        "deletion",
        "Product Deletion",
        "minus-circle",
        vec![contract_fields()?, product, contact_fields()?],
    )
}

fn description_change_config() -> AppResult<DocumentConfig> {
    let mut product = product_identity_fields()?;
    product.push(field(
        "currentDescription",
        "Current Description",
        FieldKind::Textarea,
        PRODUCT_SECTION,
    )?);
    product.push(
        required(
            "revisedDescription",
            "Revised Description",
            FieldKind::Textarea,
            PRODUCT_SECTION,
        )?
        .with_rule(ValidationRule::max_length(
            500,
            "Description must be 500 characters or fewer",
        )),
    );
    product.push(required(
        "changeReason",
        "Reason for Change",
        FieldKind::Textarea,
        PRODUCT_SECTION,
    )?);

    assemble(
        "description-change",
        "Description Change",
        "file-pen",
        vec![contract_fields()?, product, contact_fields()?],
    )
}

fn price_change_config(id: &str, name: &str, icon: &str) -> AppResult<DocumentConfig> {
    let mut pricing = vec![
        price("currentPrice", "Current GSA Price")?,
        price("proposedPrice", "Proposed GSA Price")?,
        percentage("percentageChange", "Percentage Change")?,
        required(
            "effectiveDate",
            "Effective Date",
            FieldKind::Date,
            PRICING_SECTION,
        )?,
    ];
    if id == "price-decrease" {
        pricing.push(field(
            "commercialPrice",
            "Commercial Price",
            FieldKind::Currency,
            PRICING_SECTION,
        )?);
    } else {
        pricing.push(required(
            "justification",
            "Justification",
            FieldKind::Textarea,
            PRICING_SECTION,
        )?);
    }

    assemble(
        id,
        name,
        icon,
        vec![
            contract_fields()?,
            product_identity_fields()?,
            pricing,
            contact_fields()?,
        ],
    )
}

#[cfg(test)]
mod tests {
    use docforge_application::{DocumentConfigSource, TemplateKind};
    use docforge_domain::{FormDataMap, FormValue, ValidationRule, validate_form};

    use super::BuiltinDocumentCatalog;

    fn catalog() -> BuiltinDocumentCatalog {
        BuiltinDocumentCatalog::new().unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn every_listed_type_has_a_config_and_template() {
        let catalog = catalog();
        let types = catalog
            .list_document_types()
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(types.len(), 5);

        for summary in types {
            let config = catalog
                .load_config(summary.id(), None)
                .await
                .unwrap_or_else(|_| unreachable!());
            assert!(!config.fields().is_empty());
            assert!(TemplateKind::resolve(summary.id()).is_ok());

            let patterns_compile = config
                .fields()
                .iter()
                .flat_map(|field| field.validation_rules())
                .all(|rule| match rule {
                    ValidationRule::Regex { pattern, .. } => pattern.is_valid(),
                    _ => true,
                });
            assert!(patterns_compile, "{} has a broken pattern", summary.id());
        }
    }

    #[tokio::test]
    async fn unknown_type_is_not_found() {
        let result = catalog().load_config("memo", None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn sections_follow_declaration_order() {
        let config = catalog()
            .load_config("price-increase", None)
            .await
            .unwrap_or_else(|_| unreachable!());
        let sections: Vec<&str> = config
            .sections()
            .iter()
            .map(|section| section.name)
            .collect();
        assert_eq!(
            sections,
            vec![
                "Contract Information",
                "Product Details",
                "Pricing",
                "Contractor Contact"
            ]
        );
    }

    #[tokio::test]
    async fn contract_number_format_is_enforced() {
        let config = catalog()
            .load_config("deletion", None)
            .await
            .unwrap_or_else(|_| unreachable!());
        let mut data = FormDataMap::new();
        data.set("contractNumber", FormValue::from("not a contract"));

        let errors = validate_form(&config, &data);
        assert!(errors.iter().any(|error| error.field_id() == "contractNumber"
            && error.message() == "Contract number must look like GS-35F-0119Y"));
    }
}
