//! Printable document structure.
//!
//! Markup is a flat list of blocks laid out top to bottom; the PDF renderer
//! decides fonts and positions. Monetary values are formatted here, at the
//! presentation boundary.

use agriflow_core::invoice::{
    InvoiceDocument, TaxMode, Totals, TotalsPolicy, amount_in_words, format_money,
};

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A table column: header label, share of the table width, alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub weight: f32,
    pub align: Align,
}

impl Column {
    fn new(label: &str, weight: f32, align: Align) -> Self {
        Self {
            label: label.to_string(),
            weight,
            align,
        }
    }
}

/// One unit of document layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Centered bold heading.
    Heading(String),
    /// Plain line of text.
    Text(String),
    /// Horizontal separator.
    Rule,
    Table {
        columns: Vec<Column>,
        rows: Vec<Vec<String>>,
    },
    /// Right-hand label/value pair, e.g. a totals row.
    Amount {
        label: String,
        value: String,
        emphasis: bool,
    },
    /// Where the layout surface image is placed.
    Snapshot,
}

/// A whole printable page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMarkup {
    pub blocks: Vec<Block>,
}

const RUPEE: &str = "Rs.";

fn money(value: rust_decimal::Decimal) -> String {
    format!("{RUPEE} {}", format_money(value))
}

impl DocumentMarkup {
    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn text(&mut self, text: impl Into<String>) {
        self.push(Block::Text(text.into()));
    }

    fn amount(&mut self, label: impl Into<String>, value: String, emphasis: bool) {
        self.push(Block::Amount {
            label: label.into(),
            value,
            emphasis,
        });
    }

    fn extra_fields(&mut self, document: &InvoiceDocument) {
        for field in document.details.extra.iter().filter(|f| f.is_printable()) {
            self.text(format!("{}: {}", field.label.trim(), field.value.trim()));
        }
    }

    /// The layout sheet: letterhead, party details, the surface, a legend.
    pub fn layout(document: &InvoiceDocument) -> Self {
        let header = &document.header;
        let details = &document.details;
        let mut markup = Self::default();
        markup.push(Block::Heading(header.title.clone()));
        markup.text(format!(
            "{} - Mob: {} - GST: {}",
            header.address, header.mobile, header.gstin
        ));
        markup.push(Block::Rule);
        markup.text(format!(
            "Farmer: {} | Village: {} | Crop: {} | Spacing: {}",
            details.farmer_name, details.village, details.crop, details.spacing
        ));
        markup.text(format!(
            "Survey No: {} | Area: {} {}",
            details.survey_no,
            details.area_value,
            details.area_unit.label()
        ));
        markup.extra_fields(document);
        markup.push(Block::Snapshot);
        markup.text("Legend: sprinkler (Y), valve (square), pipe (line), direction (arrow)");
        markup
    }

    /// The quotation or tax invoice, depending on the document variant.
    pub fn document(document: &InvoiceDocument, totals: &Totals, policy: &TotalsPolicy) -> Self {
        let header = &document.header;
        let details = &document.details;
        let per_item = policy.tax_mode == TaxMode::PerItem;
        let mut markup = Self::default();

        markup.push(Block::Heading(header.title.clone()));
        markup.text(header.address.clone());
        markup.text(format!("Distributor: {} | Mob: {}", header.distributor, header.mobile));
        markup.text(format!("GSTIN: {}", header.gstin));
        markup.push(Block::Heading(document.variant.title().to_string()));
        markup.text(format!("No: {}    Date: {}", details.number, details.date));
        markup.push(Block::Rule);

        markup.text(format!("Farmer: {}", details.farmer_name));
        markup.text(format!("Village: {}    Crop: {}", details.village, details.crop));
        markup.text(format!(
            "Spacing: {}    Survey No: {}    Area: {} {}",
            details.spacing,
            details.survey_no,
            details.area_value,
            details.area_unit.label()
        ));
        markup.extra_fields(document);

        let mut columns = vec![
            Column::new("No", 0.6, Align::Left),
            Column::new("Description", 3.4, Align::Left),
            Column::new("Size", 1.8, Align::Left),
            Column::new("Qty", 0.9, Align::Right),
            Column::new("Rate", 1.4, Align::Right),
        ];
        if per_item {
            columns.push(Column::new("GST %", 0.9, Align::Right));
        }
        columns.push(Column::new("Amount", 1.6, Align::Right));

        let rows = document
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut row = vec![
                    (i + 1).to_string(),
                    item.description.clone(),
                    item.size_label.clone(),
                    item.quantity.to_string(),
                    format_money(item.unit_rate.value()),
                ];
                if per_item {
                    row.push(item.tax_rate_percent.to_string());
                }
                row.push(format_money(item.line_amount()));
                row
            })
            .collect();
        markup.push(Block::Table { columns, rows });

        markup.amount("Sub-Total", money(totals.subtotal), false);
        markup.amount("Installation", money(totals.installation), false);
        markup.amount("Discount", format!("- {}", money(totals.discount)), false);
        markup.amount("Taxable", money(totals.taxable_base), false);
        for bucket in &totals.tax_breakdown {
            markup.amount(format!("GST ({}%)", bucket.rate_percent), money(bucket.tax), false);
        }
        markup.amount("Round Off", money(totals.round_off), false);
        markup.amount("TOTAL", money(totals.final_total), true);

        markup.text(format!("Amount in words: {}", amount_in_words(totals.final_total)));
        markup.push(Block::Rule);
        markup.text("Notes:");
        markup.text("- Accessories / fittings charge usually 3-10% (choose per-case)");
        markup.text("- Subsidy / government rules may apply - verify with scheme");
        markup.text("Customer signature: ____________________");
        markup.text(format!("For: {}", header.title));
        markup.text("Authorised Sign: ____________________");
        markup
    }

    /// Check whether the page includes the layout surface.
    pub fn has_snapshot(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, Block::Snapshot))
    }

    /// All text of the page, one entry per line or table row.
    pub fn text_lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|block| match block {
                Block::Heading(text) | Block::Text(text) => vec![text.clone()],
                Block::Amount { label, value, .. } => vec![format!("{label}: {value}")],
                Block::Table { columns, rows } => {
                    let header = columns.iter().map(|c| c.label.as_str()).collect::<Vec<_>>().join(" | ");
                    std::iter::once(header)
                        .chain(rows.iter().map(|row| row.join(" | ")))
                        .collect()
                }
                Block::Rule | Block::Snapshot => Vec::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriflow_core::invoice::{DocumentVariant, ExtraField, LineItem, RoundingPolicy};

    fn lines(markup: &DocumentMarkup) -> String {
        markup.text_lines().join("\n")
    }

    #[test]
    fn test_quotation_markup() {
        let document = InvoiceDocument::default();
        let policy = TotalsPolicy::default();
        let markup = DocumentMarkup::document(&document, &document.totals(&policy), &policy);
        let text = lines(&markup);

        assert!(text.contains("QUOTATION"));
        assert!(text.contains("1 | Sprinkler Pipe | Finolex 3/4\" | 30 | 659.00 | 19,770.00"));
        assert!(text.contains("Sub-Total: Rs. 25,738.00"));
        assert!(text.contains("GST (18%): Rs. 4,632.84"));
        assert!(text.contains("TOTAL: Rs. 30,370.84"));
        assert!(text.contains("Thirty Thousand Three Hundred Seventy Rupees and Eighty Four Paise Only"));
        assert!(!markup.has_snapshot());
    }

    #[test]
    fn test_tax_invoice_title() {
        let document = InvoiceDocument::default().with_variant(DocumentVariant::TaxInvoice);
        let policy = TotalsPolicy::default();
        let markup = DocumentMarkup::document(&document, &document.totals(&policy), &policy);
        assert_eq!(markup.blocks[4], Block::Heading("TAX INVOICE".to_string()));
    }

    #[test]
    fn test_per_item_rows_by_rate() {
        let mut document = InvoiceDocument::empty();
        document.add_item(LineItem::new("Lateral", "16 mm", 10, 100).with_tax_rate(5));
        document.add_item(LineItem::new("Filter", "Disc", 2, 1000).with_tax_rate(18));
        let policy = TotalsPolicy::new(TaxMode::PerItem, RoundingPolicy::Manual);
        let markup = DocumentMarkup::document(&document, &document.totals(&policy), &policy);
        let text = lines(&markup);

        assert!(text.contains("No | Description | Size | Qty | Rate | GST % | Amount"));
        assert!(text.contains("GST (5%): Rs. 50.00"));
        assert!(text.contains("GST (18%): Rs. 360.00"));
        assert!(text.contains("TOTAL: Rs. 3,410.00"));
    }

    #[test]
    fn test_layout_markup() {
        let mut document = InvoiceDocument::default();
        document.details.farmer_name = "Patil".to_string();
        document.details.extra[0] = ExtraField::new("Application ID", "MH-2024-17");
        let markup = DocumentMarkup::layout(&document);
        let text = lines(&markup);

        assert!(markup.has_snapshot());
        assert!(text.contains("Farmer: Patil"));
        assert!(text.contains("Application ID: MH-2024-17"));
        assert!(!text.contains("TOTAL"));
    }

    #[test]
    fn test_unfilled_extra_fields_omitted() {
        let document = InvoiceDocument::default();
        let text = lines(&DocumentMarkup::layout(&document));
        assert!(!text.contains("Application ID"));
    }
}
