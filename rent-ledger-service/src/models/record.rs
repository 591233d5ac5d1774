use super::status::{classify, StatusTier};
use chrono::{DateTime, Utc};
use mongodb::bson::Bson;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid month: {}", s))
    }
}

/// Month names are accepted in any letter case (`march`, `MARCH`).
impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse::<Month>()
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Rent,
    Maintenance,
    Electricity,
    Commercial,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Rent,
        Category::Maintenance,
        Category::Electricity,
        Category::Commercial,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::Maintenance => "Maintenance",
            Self::Electricity => "Electricity",
            Self::Commercial => "Commercial",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tenant's bill for one month, as persisted in the `rent` collection.
///
/// Amounts are stored as BSON doubles and the creation time under
/// `timestamp`, matching documents written by earlier tooling. Those older
/// documents carry ObjectId keys, which are read back as their hex string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    #[serde(rename = "_id", deserialize_with = "deserialize_record_id")]
    pub id: String,
    pub city: String,
    pub property_name: String,
    #[serde(default)]
    pub unit: String,
    pub tenant_name: String,
    pub month: Month,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub billed_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub notes: String,
    #[serde(
        rename = "timestamp",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}

fn deserialize_record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::String(id) => Ok(id),
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        other => Err(de::Error::custom(format!(
            "unsupported billing record id: {}",
            other
        ))),
    }
}

impl BillingRecord {
    /// Builds a record from validated input, assigning a fresh id and
    /// creation time.
    pub fn create(new: NewBillingRecord) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            city: new.city,
            property_name: new.property_name,
            unit: new.unit,
            tenant_name: new.tenant_name,
            month: new.month,
            category: new.category,
            billed_amount: new.billed_amount,
            paid_amount: new.paid_amount,
            notes: new.notes,
            created_at: Utc::now(),
        }
    }

    pub fn outstanding(&self) -> Decimal {
        self.billed_amount - self.paid_amount
    }

    pub fn status(&self) -> StatusTier {
        classify(self.billed_amount, self.paid_amount)
    }

    /// Applies the mutable subset of fields. Everything else is fixed at
    /// creation.
    pub fn apply(&mut self, update: &RecordUpdate) {
        if let Some(paid) = update.paid_amount {
            self.paid_amount = paid;
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone();
        }
    }
}

/// Largest billed or paid amount a record may carry (one billion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Input for a new billing record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillingRecord {
    pub city: String,
    pub property_name: String,
    pub unit: String,
    pub tenant_name: String,
    pub month: Month,
    pub category: Category,
    pub billed_amount: Decimal,
    pub paid_amount: Decimal,
    pub notes: String,
}

impl NewBillingRecord {
    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.city.is_empty() {
            missing.push("city");
        }
        if self.property_name.is_empty() {
            missing.push("property_name");
        }
        if self.tenant_name.is_empty() {
            missing.push("tenant_name");
        }
        missing
    }

    /// Names of amount fields holding a negative value.
    pub fn negative_amounts(&self) -> Vec<&'static str> {
        let mut negative = Vec::new();
        if self.billed_amount < Decimal::ZERO {
            negative.push("billed_amount");
        }
        if self.paid_amount < Decimal::ZERO {
            negative.push("paid_amount");
        }
        negative
    }

    /// Names of amount fields above `MAX_AMOUNT`.
    pub fn oversized_amounts(&self) -> Vec<&'static str> {
        let mut oversized = Vec::new();
        if self.billed_amount > MAX_AMOUNT {
            oversized.push("billed_amount");
        }
        if self.paid_amount > MAX_AMOUNT {
            oversized.push("paid_amount");
        }
        oversized
    }
}

/// Partial update of a billing record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    pub paid_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.paid_amount.is_none() && self.notes.is_none()
    }
}
