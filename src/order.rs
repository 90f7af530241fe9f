//! Order domain types
//!
//! An order starts life as [`OrderDetails`], the five slots the agent fills in
//! conversation, and becomes an [`OrderRecord`] once it is finalized and
//! stamped with an id and creation time.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp layout written into every record (local time, microseconds, no offset)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// The five order slots collected from the customer
///
/// Every field is free-form. Nothing here checks for emptiness or allowed
/// values; whatever the agent extracted is stored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Drink type (Latte, Cappuccino, ...)
    pub drink_type: String,
    /// Size (Small, Medium, Large)
    pub size: String,
    /// Milk preference (Whole, Oat, ...)
    pub milk: String,
    /// Extras, or the literal "None"
    pub extras: String,
    /// Customer name
    pub name: String,
}

impl OrderDetails {
    /// Create order details from the five slot values
    #[must_use]
    pub fn new(
        drink_type: impl Into<String>,
        size: impl Into<String>,
        milk: impl Into<String>,
        extras: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            drink_type: drink_type.into(),
            size: size.into(),
            milk: milk.into(),
            extras: extras.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for OrderDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}), {} milk, extras: {}",
            self.drink_type, self.size, self.milk, self.extras
        )
    }
}

/// One finalized order as persisted to the history and snapshot documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Millisecond-derived identifier
    pub id: i64,
    pub drink_type: String,
    pub size: String,
    pub milk: String,
    pub extras: String,
    pub name: String,
    /// ISO-8601 creation time
    pub timestamp: String,
}

impl OrderRecord {
    /// Build a record from finalized details
    #[must_use]
    pub fn new(id: i64, details: &OrderDetails, created_at: DateTime<Local>) -> Self {
        Self {
            id,
            drink_type: details.drink_type.clone(),
            size: details.size.clone(),
            milk: details.milk.clone(),
            extras: details.extras.clone(),
            name: details.name.clone(),
            timestamp: format_timestamp(created_at),
        }
    }

    /// Whether the five order slots equal `details`
    #[must_use]
    pub fn matches(&self, details: &OrderDetails) -> bool {
        self.drink_type == details.drink_type
            && self.size == details.size
            && self.milk == details.milk
            && self.extras == details.extras
            && self.name == details.name
    }

    /// The order slots of this record
    #[must_use]
    pub fn details(&self) -> OrderDetails {
        OrderDetails::new(
            self.drink_type.clone(),
            self.size.clone(),
            self.milk.clone(),
            self.extras.clone(),
            self.name.clone(),
        )
    }
}

/// Render a creation time the way records store it
#[must_use]
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.naive_local().format(TIMESTAMP_FORMAT).to_string()
}

/// Hands out order ids from the millisecond clock
///
/// Ids from one generator are strictly increasing. When two orders land in the
/// same millisecond (or the clock steps backwards) the previous id plus one is
/// used instead. Separate processes share no state, so ids may still collide
/// across them.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    last: AtomicI64,
}

impl OrderIdGenerator {
    /// Create a generator with no ids issued yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next id for an order created at `now_ms` (milliseconds since epoch)
    #[must_use]
    pub fn next_id(&self, now_ms: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = if now_ms > prev { now_ms } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Stamp `details` as a new record created now
    #[must_use]
    pub fn stamp(&self, details: &OrderDetails) -> OrderRecord {
        let now = Local::now();
        let id = self.next_id(now.timestamp_millis());
        OrderRecord::new(id, details, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn latte() -> OrderDetails {
        OrderDetails::new("Latte", "Medium", "Oat", "None", "Alex")
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let at = Local.with_ymd_and_hms(2025, 11, 24, 10, 15, 30).unwrap();
        let record = OrderRecord::new(1_764_000_000_000, &latte(), at);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["drinkType"], "Latte");
        assert_eq!(json["size"], "Medium");
        assert_eq!(json["milk"], "Oat");
        assert_eq!(json["extras"], "None");
        assert_eq!(json["name"], "Alex");
        assert_eq!(json["id"], 1_764_000_000_000_i64);
        assert_eq!(json["timestamp"], "2025-11-24T10:15:30.000000");
        assert!(json.get("drink_type").is_none());
    }

    #[test]
    fn details_deserialize_from_snake_case_arguments() {
        let details: OrderDetails = serde_json::from_str(
            r#"{"drink_type":"Mocha","size":"Large","milk":"Soy","extras":"Caramel Drizzle","name":"Sam"}"#,
        )
        .unwrap();
        assert_eq!(details.drink_type, "Mocha");
        assert_eq!(details.extras, "Caramel Drizzle");
    }

    #[test]
    fn record_matches_its_details() {
        let record = OrderIdGenerator::new().stamp(&latte());
        assert!(record.matches(&latte()));
        assert_eq!(record.details(), latte());

        let other = OrderDetails::new("Latte", "Large", "Oat", "None", "Alex");
        assert!(!record.matches(&other));
    }

    #[test]
    fn ids_follow_the_clock() {
        let ids = OrderIdGenerator::new();
        assert_eq!(ids.next_id(1_000), 1_000);
        assert_eq!(ids.next_id(1_500), 1_500);
    }

    #[test]
    fn same_millisecond_ids_are_bumped() {
        let ids = OrderIdGenerator::new();
        assert_eq!(ids.next_id(2_000), 2_000);
        assert_eq!(ids.next_id(2_000), 2_001);
        assert_eq!(ids.next_id(2_000), 2_002);
        // Clock stepping backwards still yields a larger id
        assert_eq!(ids.next_id(1_000), 2_003);
    }

    #[test]
    fn display_summarizes_the_drink() {
        assert_eq!(latte().to_string(), "Latte (Medium), Oat milk, extras: None");
    }
}
