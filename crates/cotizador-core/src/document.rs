//! # Document Composition
//!
//! Builds the typed document tree consumed by renderers.
//!
//! ## Document Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Block::Header          AUTOROSEMBERG + detail lines + logo             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Block::ClientInfo      CLIENTE / DIRECCION / C.C. ó NIT                │
//! │  Block::QuotationInfo   COTIZACIÓN N° COT-2 / FECHA 16/10/2026          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Block::ItemTable       Unit │ Descripción │ Valor Unitario │ Valor Total│
//! │                          1   │ Pintura     │                │ $ 50.000   │
//! │                          2   │ Latonería   │                │            │
//! │                         ─────────────────────────────────── Total: $ 50.000
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Block::Signatures      [blank] FIRMA COMPRADOR   [image] FIRMA VENDEDOR│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All text is plain. Escaping belongs to the renderer, so client input can
//! never turn into markup.
//!
//! The "Valor Unitario" cell is always blank, and an item without a value
//! shows an empty "Valor Total" cell while adding zero to the total.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ValidationError, ValidationResult};
use crate::money::CurrencyFormat;
use crate::template::{self, CompanyProfile};
use crate::types::{total_of, ClientRecord, LineItem, Quotation, QuotationNumber};

// =============================================================================
// Document Tree
// =============================================================================

/// Reference to an external image, resolved by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    /// Path relative to the asset directory.
    pub path: String,
    /// Alternative text.
    pub alt: String,
}

impl ImageRef {
    pub fn new(path: impl Into<String>, alt: impl Into<String>) -> Self {
        ImageRef {
            path: path.into(),
            alt: alt.into(),
        }
    }
}

/// Complete quotation document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Top-level sections, always in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header(HeaderBlock),
    ClientInfo(ClientInfoBlock),
    QuotationInfo(QuotationInfoBlock),
    ItemTable(ItemTable),
    Signatures(SignatureBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderBlock {
    pub company_name: String,
    pub details: Vec<String>,
    pub logo: ImageRef,
}

/// A label with its value, e.g. `CLIENTE:` / `Juan Perez`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledField {
    pub label: String,
    pub value: String,
}

impl LabeledField {
    fn new(label: &str, value: &str) -> Self {
        LabeledField {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfoBlock {
    pub fields: Vec<LabeledField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotationInfoBlock {
    pub title: String,
    /// e.g. `N° COT-2`
    pub number: String,
    pub date_label: String,
    /// es-CO short date, e.g. `16/10/2026`
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemTable {
    pub columns: Vec<String>,
    pub rows: Vec<ItemRow>,
    pub total: TotalRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    /// 1-based position.
    pub index: usize,
    pub description: String,
    /// Always empty.
    pub unit_value: String,
    /// Formatted value, empty when the item has none.
    pub total_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    pub slots: Vec<SignatureSlot>,
}

/// A signature line; `image` is `None` for a slot signed by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureSlot {
    pub label: String,
    pub image: Option<ImageRef>,
}

impl Document {
    /// The item table, if present.
    pub fn item_table(&self) -> Option<&ItemTable> {
        self.blocks.iter().find_map(|b| match b {
            Block::ItemTable(table) => Some(table),
            _ => None,
        })
    }

    /// Every image the renderer has to resolve, in document order.
    pub fn image_refs(&self) -> Vec<&ImageRef> {
        let mut refs = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Header(header) => refs.push(&header.logo),
                Block::Signatures(signatures) => {
                    refs.extend(signatures.slots.iter().filter_map(|s| s.image.as_ref()))
                }
                _ => {}
            }
        }
        refs
    }
}

// =============================================================================
// Composer
// =============================================================================

/// Formats a date the way es-CO short dates read: `d/m/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// Turns client data, items and an issued number into a [`Document`].
///
/// Pure: the output depends only on the inputs, the profile and the format.
#[derive(Debug, Clone, Default)]
pub struct DocumentComposer {
    profile: CompanyProfile,
    currency: CurrencyFormat,
}

impl DocumentComposer {
    pub fn new(profile: CompanyProfile, currency: CurrencyFormat) -> Self {
        DocumentComposer { profile, currency }
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// Composes a document.
    ///
    /// ## Errors
    /// - `MissingClientName` if the client name is blank
    /// - `EmptyLineItems` if there are no items
    ///
    /// No document is produced on error.
    pub fn compose(
        &self,
        client: &ClientRecord,
        items: &[LineItem],
        number: &QuotationNumber,
        date: NaiveDate,
    ) -> ValidationResult<Document> {
        if client.name.trim().is_empty() {
            return Err(ValidationError::MissingClientName);
        }
        if items.is_empty() {
            return Err(ValidationError::EmptyLineItems);
        }

        let blocks = vec![
            Block::Header(self.header()),
            Block::ClientInfo(ClientInfoBlock {
                fields: vec![
                    LabeledField::new(template::LABEL_CLIENT, &client.name),
                    LabeledField::new(template::LABEL_ADDRESS, client.address_text()),
                    LabeledField::new(template::LABEL_CLIENT_ID, &client.id_number),
                ],
            }),
            Block::QuotationInfo(QuotationInfoBlock {
                title: template::LABEL_QUOTATION.to_string(),
                number: format!("{} {}", template::LABEL_NUMBER_PREFIX, number),
                date_label: template::LABEL_DATE.to_string(),
                date: format_date(date),
            }),
            Block::ItemTable(self.item_table(items)),
            Block::Signatures(self.signatures()),
        ];

        Ok(Document {
            title: self.profile.document_title.clone(),
            blocks,
        })
    }

    /// Composes a document from an assembled [`Quotation`].
    pub fn compose_quotation(&self, quotation: &Quotation) -> ValidationResult<Document> {
        self.compose(
            &quotation.client,
            &quotation.items,
            &quotation.number,
            quotation.date,
        )
    }

    fn header(&self) -> HeaderBlock {
        HeaderBlock {
            company_name: self.profile.name.clone(),
            details: self.profile.details.clone(),
            logo: self.profile.logo_ref(),
        }
    }

    fn item_table(&self, items: &[LineItem]) -> ItemTable {
        let rows = items
            .iter()
            .enumerate()
            .map(|(i, item)| ItemRow {
                index: i + 1,
                description: item.description().to_string(),
                unit_value: String::new(),
                total_value: self.currency.format(item.value()),
            })
            .collect();

        ItemTable {
            columns: template::ITEM_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
            total: TotalRow {
                label: template::LABEL_TOTAL.to_string(),
                value: self.currency.format_money(total_of(items)),
            },
        }
    }

    fn signatures(&self) -> SignatureBlock {
        SignatureBlock {
            slots: vec![
                SignatureSlot {
                    label: template::LABEL_BUYER_SIGNATURE.to_string(),
                    image: None,
                },
                SignatureSlot {
                    label: template::LABEL_VENDOR_SIGNATURE.to_string(),
                    image: Some(self.profile.signature_ref()),
                },
            ],
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
    }

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new("Pintura", Some(Money::from_units(50_000))).unwrap(),
            LineItem::new("Latonería", None).unwrap(),
        ]
    }

    fn juan() -> ClientRecord {
        ClientRecord::new("Juan Perez", "", "123")
    }

    #[test]
    fn test_compose_block_order() {
        let composer = DocumentComposer::default();
        let doc = composer
            .compose(&juan(), &sample_items(), &QuotationNumber::new(2), date())
            .unwrap();

        assert_eq!(doc.title, "Factura Autorosemberg");
        assert!(matches!(
            doc.blocks.as_slice(),
            [
                Block::Header(_),
                Block::ClientInfo(_),
                Block::QuotationInfo(_),
                Block::ItemTable(_),
                Block::Signatures(_),
            ]
        ));
    }

    #[test]
    fn test_compose_rows_and_total() {
        let composer = DocumentComposer::default();
        let doc = composer
            .compose(&juan(), &sample_items(), &QuotationNumber::new(2), date())
            .unwrap();

        let table = doc.item_table().unwrap();
        assert_eq!(table.columns, template::ITEM_COLUMNS);
        assert_eq!(table.rows.len(), 2);

        assert_eq!(table.rows[0].index, 1);
        assert_eq!(table.rows[0].description, "Pintura");
        assert_eq!(table.rows[0].unit_value, "");
        assert_eq!(table.rows[0].total_value, "$ 50.000");

        assert_eq!(table.rows[1].index, 2);
        assert_eq!(table.rows[1].total_value, "");

        assert_eq!(table.total.label, "Total:");
        assert_eq!(table.total.value, "$ 50.000");
    }

    #[test]
    fn test_compose_client_and_quotation_info() {
        let composer = DocumentComposer::default();
        let doc = composer
            .compose(&juan(), &sample_items(), &QuotationNumber::new(2), date())
            .unwrap();

        let Block::ClientInfo(client) = &doc.blocks[1] else {
            panic!("expected client block");
        };
        let values: Vec<&str> = client.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, ["Juan Perez", "", "123"]);
        assert_eq!(client.fields[1].label, "DIRECCION:");

        let Block::QuotationInfo(info) = &doc.blocks[2] else {
            panic!("expected quotation info");
        };
        assert_eq!(info.number, "N° COT-2");
        assert_eq!(info.date, "5/3/2026");
    }

    #[test]
    fn test_compose_signatures() {
        let doc = DocumentComposer::default()
            .compose(&juan(), &sample_items(), &QuotationNumber::new(2), date())
            .unwrap();

        let Block::Signatures(signatures) = &doc.blocks[4] else {
            panic!("expected signatures");
        };
        assert_eq!(signatures.slots.len(), 2);
        assert_eq!(signatures.slots[0].label, "FIRMA COMPRADOR");
        assert!(signatures.slots[0].image.is_none());
        assert_eq!(signatures.slots[1].label, "FIRMA VENDEDOR");
        assert_eq!(signatures.slots[1].image.as_ref().unwrap().path, "FIRMA.jpg");

        let images: Vec<&str> = doc.image_refs().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(images, ["LOGO.jpg", "FIRMA.jpg"]);
    }

    #[test]
    fn test_compose_validation() {
        let composer = DocumentComposer::default();
        let number = QuotationNumber::new(1);

        let nameless = ClientRecord::new("  ", "", "123");
        assert_eq!(
            composer.compose(&nameless, &sample_items(), &number, date()),
            Err(ValidationError::MissingClientName)
        );
        assert_eq!(
            composer.compose(&juan(), &[], &number, date()),
            Err(ValidationError::EmptyLineItems)
        );
    }

    #[test]
    fn test_compose_is_idempotent() {
        let composer = DocumentComposer::default();
        let a = composer
            .compose(&juan(), &sample_items(), &QuotationNumber::new(9), date())
            .unwrap();
        let b = composer
            .compose(&juan(), &sample_items(), &QuotationNumber::new(9), date())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_client_text_is_kept_verbatim() {
        let client = ClientRecord::new("<b>Ana</b> & Co", "Calle \"8\"", "1");
        let doc = DocumentComposer::default()
            .compose(&client, &sample_items(), &QuotationNumber::new(3), date())
            .unwrap();

        let Block::ClientInfo(info) = &doc.blocks[1] else {
            panic!("expected client block");
        };
        assert_eq!(info.fields[0].value, "<b>Ana</b> & Co");
    }

    #[test]
    fn test_compose_quotation_matches_compose() {
        let composer = DocumentComposer::default();
        let quotation = Quotation::new(juan(), sample_items(), QuotationNumber::new(4), date());

        assert_eq!(quotation.total, Money::from_units(50_000));
        assert_eq!(
            composer.compose_quotation(&quotation).unwrap(),
            composer
                .compose(&juan(), &sample_items(), &QuotationNumber::new(4), date())
                .unwrap()
        );
    }

    #[test]
    fn test_document_serializes_with_block_kinds() {
        let doc = DocumentComposer::default()
            .compose(&juan(), &sample_items(), &QuotationNumber::new(2), date())
            .unwrap();
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["blocks"][0]["kind"], "header");
        assert_eq!(json["blocks"][3]["kind"], "item_table");
        assert_eq!(json["blocks"][3]["total"]["value"], "$ 50.000");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(format_date(date), "16/10/2026");
    }
}
