use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use docforge_core::{AppError, AppResult};
use docforge_domain::{DocumentAst, FormDataMap};

use crate::document_ports::LogoSizing;

mod addition;
mod deletion;
mod description_change;
mod letter;
mod price_change;

use letter::LetterFields;

/// Letter template selected by document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// New product addition request.
    ProductAddition,
    /// Product deletion request.
    ProductDeletion,
    /// Product description change request.
    DescriptionChange,
    /// Economic price adjustment upward.
    PriceIncrease,
    /// Price reduction notice.
    PriceDecrease,
}

impl TemplateKind {
    /// Every template kind in registry order.
    pub const ALL: [Self; 5] = [
        Self::ProductAddition,
        Self::ProductDeletion,
        Self::DescriptionChange,
        Self::PriceIncrease,
        Self::PriceDecrease,
    ];

    /// Resolves the template for a document type identifier.
    pub fn resolve(document_type_id: &str) -> AppResult<Self> {
        Self::from_str(document_type_id)
    }

    /// Returns the document type identifier served by this template.
    #[must_use]
    pub fn document_type_id(&self) -> &'static str {
        match self {
            Self::ProductAddition => "addition",
            Self::ProductDeletion => "deletion",
            Self::DescriptionChange => "description-change",
            Self::PriceIncrease => "price-increase",
            Self::PriceDecrease => "price-decrease",
        }
    }

    /// Returns the prefix used for exported file names.
    #[must_use]
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::ProductAddition => "Product_Addition",
            Self::ProductDeletion => "Product_Deletion",
            Self::DescriptionChange => "Description_Change",
            Self::PriceIncrease => "Price_Increase",
            Self::PriceDecrease => "Price_Decrease",
        }
    }

    /// Returns how the letterhead logo is placed for this template.
    #[must_use]
    pub fn logo_sizing(&self) -> LogoSizing {
        match self {
            Self::PriceIncrease | Self::PriceDecrease => {
                LogoSizing::ProportionalHeight { height_pt: 70 }
            }
            Self::ProductAddition | Self::ProductDeletion | Self::DescriptionChange => {
                LogoSizing::default()
            }
        }
    }

    /// Renders the letter body dated today.
    #[must_use]
    pub fn render(&self, form_data: &FormDataMap) -> RenderedTemplate {
        self.render_on(form_data, Utc::now().date_naive())
    }

    /// Renders the letter body, using `today` when no modification date was entered.
    #[must_use]
    pub fn render_on(&self, form_data: &FormDataMap, today: NaiveDate) -> RenderedTemplate {
        let fields = LetterFields::new(form_data, today);
        let body = match self {
            Self::ProductAddition => addition::render(&fields),
            Self::ProductDeletion => deletion::render(&fields),
            Self::DescriptionChange => description_change::render(&fields),
            Self::PriceIncrease => price_change::render(&fields, price_change::Direction::Up),
            Self::PriceDecrease => price_change::render(&fields, price_change::Direction::Down),
        };

        RenderedTemplate {
            body,
            logo_sizing: self.logo_sizing(),
            file_stem: fields.file_stem(self.file_prefix()),
        }
    }
}

impl FromStr for TemplateKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.document_type_id() == value)
            .ok_or_else(|| {
                AppError::Validation(format!("no letter template for document type '{value}'"))
            })
    }
}

/// Output of one template render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    /// Letter body as a document tree.
    pub body: DocumentAst,
    /// Letterhead logo placement.
    pub logo_sizing: LogoSizing,
    /// Suggested file name without extension.
    pub file_stem: String,
}

#[cfg(test)]
mod tests;
