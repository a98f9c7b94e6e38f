use chrono::NaiveDate;
use docforge_domain::{BlockNode, DocumentAst, FormDataMap, InlineNode, parse_numeric};

/// Rendered in place of values the operator left empty.
pub(super) const BLANK: &str = "________";

/// Read-only view of form data with letter formatting helpers.
pub(super) struct LetterFields<'a> {
    form_data: &'a FormDataMap,
    today: NaiveDate,
}

impl<'a> LetterFields<'a> {
    pub(super) fn new(form_data: &'a FormDataMap, today: NaiveDate) -> Self {
        Self { form_data, today }
    }

    /// Trimmed value, or the blank line when empty.
    pub(super) fn value(&self, field_id: &str) -> String {
        let value = self.form_data.text(field_id);
        let trimmed = value.trim();
        if trimmed.is_empty() {
            BLANK.to_owned()
        } else {
            trimmed.to_owned()
        }
    }

    /// Whether the operator entered anything for the field.
    pub(super) fn has(&self, field_id: &str) -> bool {
        !self.form_data.text(field_id).trim().is_empty()
    }

    /// Amount formatted as US dollars. Non-numeric input is echoed as entered.
    pub(super) fn currency(&self, field_id: &str) -> String {
        let raw = self.form_data.text(field_id);
        match parse_numeric(&raw) {
            Some(amount) => format_usd(amount),
            None => self.value(field_id),
        }
    }

    /// Percentage with a trailing `%`.
    pub(super) fn percentage(&self, field_id: &str) -> String {
        let raw = self.form_data.text(field_id);
        match parse_numeric(&raw) {
            Some(percent) => format!("{}%", trim_fraction(percent)),
            None => self.value(field_id),
        }
    }

    /// Long-form date. ISO input is reformatted, anything else is echoed.
    pub(super) fn date(&self, field_id: &str) -> String {
        let raw = self.form_data.text(field_id);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return BLANK.to_owned();
        }
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => long_date(date),
            Err(_) => trimmed.to_owned(),
        }
    }

    /// Letter date: the modification date when entered, otherwise today.
    pub(super) fn letter_date(&self) -> String {
        if self.has("modificationDate") {
            self.date("modificationDate")
        } else {
            long_date(self.today)
        }
    }

    pub(super) fn file_stem(&self, prefix: &str) -> String {
        let contract: String = self
            .form_data
            .text("contractNumber")
            .trim()
            .chars()
            .map(|character| {
                if character.is_ascii_alphanumeric() || character == '-' {
                    character
                } else {
                    '_'
                }
            })
            .collect();

        if contract.is_empty() {
            prefix.to_owned()
        } else {
            format!("{prefix}_{contract}")
        }
    }
}

/// Letter sections that vary per template.
pub(super) struct LetterBody {
    pub(super) subject: &'static str,
    pub(super) paragraphs: Vec<Vec<InlineNode>>,
    pub(super) details_intro: &'static str,
    pub(super) details: Vec<Vec<InlineNode>>,
}

/// Wraps a template body in the shared letterhead, salutation and signature.
pub(super) fn compose(fields: &LetterFields<'_>, body: LetterBody) -> DocumentAst {
    let mut document = DocumentAst::default();

    document.push(BlockNode::paragraph(vec![InlineNode::text(fields.letter_date())]));
    document.push(BlockNode::paragraph(lines(vec![
        fields.value("contractingOfficer"),
        "Contracting Officer".to_owned(),
        "General Services Administration".to_owned(),
        fields.value("contractingOfficerEmail"),
    ])));
    document.push(BlockNode::heading(
        2,
        vec![InlineNode::text(format!(
            "RE: {}, Contract No. {}",
            body.subject,
            fields.value("contractNumber")
        ))],
    ));
    document.push(BlockNode::paragraph(vec![InlineNode::text(format!(
        "Dear {}:",
        fields.value("contractingOfficer")
    ))]));

    for paragraph in body.paragraphs {
        document.push(BlockNode::paragraph(paragraph));
    }

    if !body.details.is_empty() {
        document.push(BlockNode::paragraph(vec![InlineNode::text(
            body.details_intro,
        )]));
        document.push(BlockNode::ordered_list(body.details));
    }

    document.push(BlockNode::paragraph(vec![InlineNode::text(format!(
        "Please direct any questions regarding this request to {} at {} or {}.",
        fields.value("contactName"),
        fields.value("contactPhone"),
        fields.value("contactEmail"),
    ))]));
    document.push(BlockNode::paragraph(vec![InlineNode::text("Sincerely,")]));
    document.push(BlockNode::paragraph(lines(vec![
        fields.value("contactName"),
        fields.value("contactTitle"),
        fields.value("contractorName"),
        fields.value("contractorAddress"),
    ])));

    document
}

/// `Label: value` detail line with a bold label.
pub(super) fn detail(label: &str, value: String) -> Vec<InlineNode> {
    vec![
        InlineNode::bold(format!("{label}: ")),
        InlineNode::text(value),
    ]
}

/// One leaf per line; multi-line values such as addresses keep their breaks.
fn lines(values: Vec<String>) -> Vec<InlineNode> {
    let mut content = Vec::with_capacity(values.len() * 2);
    for line in values.iter().flat_map(|value| value.lines()) {
        if !content.is_empty() {
            content.push(InlineNode::HardBreak);
        }
        content.push(InlineNode::text(line));
    }
    content
}

pub(super) fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub(super) fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let digits = dollars.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn trim_fraction(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}
