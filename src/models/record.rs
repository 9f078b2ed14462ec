use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Discriminant of a [`SearchRecord`].
///
/// Declaration order is the canonical display priority used when grouping.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EntityType {
    Document,
    Invoice,
    /// Also accepted lower-cased, as configuration keys arrive that way
    #[serde(alias = "purchaseorder")]
    PurchaseOrder,
    Bill,
    Receipt,
    Payment,
    Person,
    Organization,
}

impl EntityType {
    /// Position in the canonical priority list (lower sorts first)
    pub fn priority(&self) -> usize {
        *self as usize
    }

    /// Whether records of this type carry totals and line items
    pub fn is_financial(&self) -> bool {
        matches!(
            self,
            EntityType::Invoice
                | EntityType::PurchaseOrder
                | EntityType::Bill
                | EntityType::Receipt
                | EntityType::Payment
        )
    }
}

/// Scalar metadata value attached to a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl MetadataValue {
    /// Text used for haystack matching; `Null` contributes nothing
    pub fn search_text(&self) -> Option<String> {
        match self {
            MetadataValue::Bool(b) => Some(b.to_string()),
            MetadataValue::Number(n) => Some(n.to_string()),
            MetadataValue::Text(s) => Some(s.clone()),
            MetadataValue::Null => None,
        }
    }
}

/// One priced line of a financial record.
///
/// `line_item_total` is authoritative and never recomputed from
/// quantity and unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub quantity: f64,

    #[serde(default)]
    pub unit_of_measure: String,

    #[serde(default)]
    pub unit_price: f64,

    #[serde(default)]
    pub line_item_total: f64,

    #[serde(default)]
    pub line_item_type: String,
}

impl LineItem {
    pub fn new(title: impl Into<String>, unit_price: f64, line_item_total: f64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            quantity: 1.0,
            unit_of_measure: "ea".to_string(),
            unit_price,
            line_item_total,
            line_item_type: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_quantity(mut self, quantity: f64, unit_of_measure: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit_of_measure = unit_of_measure.into();
        self
    }

    pub fn with_type(mut self, line_item_type: impl Into<String>) -> Self {
        self.line_item_type = line_item_type.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetails {
    #[serde(default)]
    pub document_type: String,

    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDetails {
    /// Total in dollars, currency agnostic
    pub total_value: f64,

    pub issued_date: NaiveDate,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl FinancialDetails {
    pub fn new(total_value: f64, issued_date: NaiveDate) -> Self {
        Self {
            total_value,
            issued_date,
            due_date: None,
            line_items: Vec::new(),
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_line_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    #[serde(default)]
    pub job_title: Option<String>,

    #[serde(default)]
    pub associated_organization: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetails {
    #[serde(default)]
    pub organization_type: Option<String>,

    #[serde(default)]
    pub trade_focus: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub website: Option<String>,
}

/// Variant-specific payload, discriminated on the wire by `entityType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entityType", rename_all = "camelCase")]
pub enum RecordDetails {
    Document(DocumentDetails),
    Invoice(FinancialDetails),
    PurchaseOrder(FinancialDetails),
    Bill(FinancialDetails),
    Receipt(FinancialDetails),
    Payment(FinancialDetails),
    Person(PersonDetails),
    Organization(OrganizationDetails),
}

impl RecordDetails {
    pub fn entity_type(&self) -> EntityType {
        match self {
            RecordDetails::Document(_) => EntityType::Document,
            RecordDetails::Invoice(_) => EntityType::Invoice,
            RecordDetails::PurchaseOrder(_) => EntityType::PurchaseOrder,
            RecordDetails::Bill(_) => EntityType::Bill,
            RecordDetails::Receipt(_) => EntityType::Receipt,
            RecordDetails::Payment(_) => EntityType::Payment,
            RecordDetails::Person(_) => EntityType::Person,
            RecordDetails::Organization(_) => EntityType::Organization,
        }
    }
}

/// A single searchable business record.
///
/// Common fields live on the struct; everything that depends on the entity
/// type lives in [`RecordDetails`], so a document can never carry a total and
/// an invoice can never carry an author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub project: String,

    #[serde(default)]
    pub client: String,

    #[serde(default)]
    pub status: String,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataValue>,

    #[serde(flatten)]
    pub details: RecordDetails,
}

impl SearchRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        updated_at: DateTime<Utc>,
        details: RecordDetails,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            project: String::new(),
            client: String::new(),
            status: String::new(),
            updated_at,
            tags: BTreeSet::new(),
            metadata: BTreeMap::new(),
            details,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn entity_type(&self) -> EntityType {
        self.details.entity_type()
    }

    /// Financial payload, if this record is an invoice, purchase order,
    /// bill, receipt or payment
    pub fn financial(&self) -> Option<&FinancialDetails> {
        match &self.details {
            RecordDetails::Invoice(f)
            | RecordDetails::PurchaseOrder(f)
            | RecordDetails::Bill(f)
            | RecordDetails::Receipt(f)
            | RecordDetails::Payment(f) => Some(f),
            RecordDetails::Document(_)
            | RecordDetails::Person(_)
            | RecordDetails::Organization(_) => None,
        }
    }

    pub fn line_items(&self) -> &[LineItem] {
        self.financial()
            .map(|f| f.line_items.as_slice())
            .unwrap_or(&[])
    }

    /// Case-folded concatenation of every searchable field
    pub fn haystack(&self) -> String {
        let mut parts: Vec<&str> = vec![
            self.title.as_str(),
            self.summary.as_str(),
            self.project.as_str(),
            self.client.as_str(),
            self.status.as_str(),
        ];
        parts.extend(self.tags.iter().map(String::as_str));

        let metadata: Vec<String> = self
            .metadata
            .values()
            .filter_map(MetadataValue::search_text)
            .collect();
        parts.extend(metadata.iter().map(String::as_str));

        match &self.details {
            RecordDetails::Document(doc) => {
                parts.push(&doc.document_type);
                parts.push(&doc.author);
            }
            RecordDetails::Invoice(f)
            | RecordDetails::PurchaseOrder(f)
            | RecordDetails::Bill(f)
            | RecordDetails::Receipt(f)
            | RecordDetails::Payment(f) => {
                for item in &f.line_items {
                    parts.push(&item.title);
                    parts.push(&item.description);
                    parts.push(&item.line_item_type);
                }
            }
            RecordDetails::Person(person) => {
                parts.extend(
                    [
                        &person.job_title,
                        &person.associated_organization,
                        &person.email,
                        &person.phone,
                        &person.location,
                    ]
                    .into_iter()
                    .flatten()
                    .map(String::as_str),
                );
            }
            RecordDetails::Organization(org) => {
                parts.extend(
                    [
                        &org.organization_type,
                        &org.trade_focus,
                        &org.email,
                        &org.phone,
                        &org.address,
                        &org.website,
                    ]
                    .into_iter()
                    .flatten()
                    .map(String::as_str),
                );
            }
        }

        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
