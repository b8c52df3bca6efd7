use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Generic `{"status": "..."}` acknowledgement.
///
/// Mutation endpoints (rule and invoice updates/deletes) answer with a
/// human-readable status string instead of the touched record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: String,
}

/// Timestamps as the backend emits them.
///
/// SQLite rows pass through the API as naive ISO 8601
/// (`2024-01-15T14:30:00`, with or without fractional seconds); some
/// deployments attach a UTC offset, and cycle fields may arrive as a bare
/// date. Serialization always writes the naive ISO form.
pub mod flexible_datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(dt);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_local());
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }
        None
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("unrecognized datetime: {raw}")))
    }
}

/// `Option` variant of [`flexible_datetime`] for nullable timestamps.
pub mod flexible_datetime_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => super::flexible_datetime::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => super::flexible_datetime::parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unrecognized datetime: {raw}"))),
        }
    }
}

pub mod invoice {
    use super::*;

    /// A bank SMS the backend stored, parsed or not.
    ///
    /// Failed extractions keep the raw text and null out the parsed fields.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Invoice {
        pub id: i64,
        /// Extracted amount in SAR.
        pub amount: Option<f64>,
        pub merchant: Option<String>,
        /// The SMS text as received.
        pub raw_invoice: String,
        #[serde(with = "crate::flexible_datetime")]
        pub created_at: NaiveDateTime,
        /// `"success"` when amount and merchant were both extracted.
        pub extraction_status: String,
        /// High level group (e.g. `Necessities`).
        pub classification: Option<String>,
        pub main_category: Option<String>,
        pub sub_category: Option<String>,
    }

    impl Invoice {
        pub fn extraction_succeeded(&self) -> bool {
            self.extraction_status == "success"
        }
    }

    /// `PATCH /invoice/{id}` body for re-categorizing an invoice.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct InvoiceUpdate {
        pub classification: String,
        pub main_category: String,
        pub sub_category: String,
    }
}

pub mod rule {
    use super::*;

    /// A merchant-classification rule.
    ///
    /// `merchant_keywords` is a comma-joined keyword set; the backend matches
    /// each keyword as a substring of the SMS merchant field, first hit wins.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Rule {
        pub id: i64,
        pub merchant_keywords: String,
        pub classification: String,
        pub main_category: String,
        pub sub_category: Option<String>,
        /// Monthly budget for `main_category`, in SAR.
        pub category_limit: Option<f64>,
    }

    /// Create/update body (`POST /rules/`, `PATCH /rule/{id}`).
    ///
    /// `sub_category` is required by the backend schema; an empty string
    /// stands for "none".
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RuleNew {
        pub merchant_keywords: String,
        pub classification: String,
        pub main_category: String,
        pub sub_category: String,
        pub category_limit: Option<f64>,
    }
}

pub mod category {
    use super::*;

    /// Per-category spending snapshot.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategorySnapshot {
        pub main_category: String,
        pub category_limit: f64,
        pub total_spent: f64,
        /// Negative once the category is overspent.
        pub remaining_limit: f64,
    }

    /// `GET /category/remaining_limit/{category}` answers with a `{status}`
    /// object when no limit is configured for the category.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum CategoryLimit {
        Limited(CategorySnapshot),
        Unlimited { status: String },
    }

    /// `GET /category/analysis/{category}`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryAnalysis {
        pub main_category: String,
        pub total_spent: f64,
        pub invoice_count: i64,
        pub average_spent: f64,
    }
}

pub mod cycle {
    use super::*;

    /// One row of `GET /cycle/history`, newest first.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CycleSummary {
        pub id: i64,
        #[serde(with = "crate::flexible_datetime")]
        pub start_date: NaiveDateTime,
        #[serde(with = "crate::flexible_datetime_opt")]
        pub end_date: Option<NaiveDateTime>,
        pub is_active: bool,
        pub total_spent: f64,
    }

    /// Active cycle as reported by `GET /cycle/current`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ActiveCycle {
        pub id: i64,
        #[serde(with = "crate::flexible_datetime")]
        pub start_date: NaiveDateTime,
        pub is_active: bool,
        /// Negative when the cycle starts in the future.
        pub days_elapsed: i64,
        /// `max(0, 30 - days_elapsed)`; the backend assumes 30-day cycles.
        pub days_remaining: i64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum CurrentCycle {
        Active(ActiveCycle),
        None { status: String },
    }

    /// Ack for `POST /cycle/start`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CycleStarted {
        pub status: String,
        pub message: String,
        pub cycle_id: i64,
        #[serde(with = "crate::flexible_datetime")]
        pub start_date: NaiveDateTime,
    }

    /// `GET /cycle/{id}/analysis`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CycleAnalysis {
        pub cycle_id: i64,
        #[serde(with = "crate::flexible_datetime")]
        pub start_date: NaiveDateTime,
        #[serde(with = "crate::flexible_datetime_opt")]
        pub end_date: Option<NaiveDateTime>,
        pub is_active: bool,
        pub total_spent: f64,
        /// Sum of every configured category limit.
        pub total_budget: f64,
        pub remaining_budget: f64,
        /// Unclamped; above 100 once the budget is blown.
        pub budget_percentage_used: f64,
        pub transaction_count: i64,
        pub average_transaction: f64,
        /// Sorted by spend, descending.
        pub category_breakdown: Vec<CategoryBreakdown>,
        /// Top five merchants by spend.
        pub top_merchants: Vec<MerchantSpend>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryBreakdown {
        /// Null for invoices no rule ever categorized.
        pub category: Option<String>,
        pub spent: f64,
        pub limit: Option<f64>,
        pub percentage_of_total: f64,
        /// Null when the category has no limit.
        pub percentage_of_limit: Option<f64>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MerchantSpend {
        pub merchant: String,
        pub spent: f64,
    }
}

pub mod sms {
    use super::*;

    /// `POST /sms/` request body.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SmsRequest {
        pub message: String,
    }

    /// Extraction result echoed back with the processing ack.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExtractedInvoice {
        pub amount: Option<f64>,
        pub merchant: Option<String>,
        pub classification: Option<String>,
        pub main_category: Option<String>,
        pub sub_category: Option<String>,
        pub raw_invoice: String,
        pub extraction_status: String,
    }

    /// `POST /sms/` response.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SmsResponse {
        pub status: String,
        #[serde(default)]
        pub extraction_status: Option<String>,
        #[serde(default)]
        pub data: Option<ExtractedInvoice>,
    }

    impl SmsResponse {
        /// Success sentinel the dashboard keys on.
        pub const PROCESSED: &'static str = "SMS processed";

        pub fn processed(&self) -> bool {
            self.status == Self::PROCESSED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_naive_iso_datetime() {
        let dt = flexible_datetime::parse("2024-01-15T14:30:00");
        let dt = dt.expect("naive ISO should parse");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 15));
        assert_eq!((dt.hour(), dt.minute()), (14, 30));
    }

    #[test]
    fn parses_fractional_seconds_and_space_separator() {
        assert!(flexible_datetime::parse("2024-01-15T14:30:00.123456").is_some());
        assert!(flexible_datetime::parse("2024-01-15 14:30:00").is_some());
    }

    #[test]
    fn parses_offset_datetime_keeping_wall_time() {
        let dt = flexible_datetime::parse("2024-01-15T14:30:00+03:00");
        let dt = dt.expect("rfc3339 should parse");
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let dt = flexible_datetime::parse("2024-01-15").expect("bare date should parse");
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn rejects_garbage_datetime() {
        assert!(flexible_datetime::parse("yesterday-ish").is_none());
    }

    #[test]
    fn invoice_decodes_backend_row() {
        let raw = r#"{
            "id": 7,
            "amount": 120.5,
            "merchant": "Tamimi Markets",
            "raw_invoice": "شراء\nمبلغ: SAR 120.50\nلدى: Tamimi Markets",
            "created_at": "2024-01-15T14:30:00",
            "extraction_status": "success",
            "classification": "Necessities",
            "main_category": "Groceries",
            "sub_category": null
        }"#;
        let invoice: invoice::Invoice = serde_json::from_str(raw).expect("invoice decodes");
        assert!(invoice.extraction_succeeded());
        assert_eq!(invoice.amount, Some(120.5));
    }

    #[test]
    fn failed_invoice_keeps_raw_text() {
        let raw = r#"{
            "id": 8,
            "amount": null,
            "merchant": null,
            "raw_invoice": "OTP code 1234",
            "created_at": "2024-01-16 09:00:00",
            "extraction_status": "failed",
            "classification": null,
            "main_category": null,
            "sub_category": null
        }"#;
        let invoice: invoice::Invoice = serde_json::from_str(raw).expect("invoice decodes");
        assert!(!invoice.extraction_succeeded());
        assert_eq!(invoice.raw_invoice, "OTP code 1234");
    }

    #[test]
    fn category_limit_decodes_snapshot() {
        let raw = r#"{
            "main_category": "Groceries",
            "category_limit": 1500.0,
            "total_spent": 1600.0,
            "remaining_limit": -100.0
        }"#;
        match serde_json::from_str::<category::CategoryLimit>(raw).expect("snapshot decodes") {
            category::CategoryLimit::Limited(snapshot) => {
                assert_eq!(snapshot.remaining_limit, -100.0);
            }
            category::CategoryLimit::Unlimited { .. } => panic!("expected snapshot"),
        }
    }

    #[test]
    fn category_limit_decodes_unlimited_sentinel() {
        let raw = r#"{"status": "No limit set for this category"}"#;
        match serde_json::from_str::<category::CategoryLimit>(raw).expect("sentinel decodes") {
            category::CategoryLimit::Unlimited { status } => {
                assert_eq!(status, "No limit set for this category");
            }
            category::CategoryLimit::Limited(_) => panic!("expected sentinel"),
        }
    }

    #[test]
    fn current_cycle_decodes_both_shapes() {
        let active = r#"{
            "id": 3,
            "start_date": "2024-01-01T00:00:00",
            "is_active": true,
            "days_elapsed": 14,
            "days_remaining": 16
        }"#;
        assert!(matches!(
            serde_json::from_str::<cycle::CurrentCycle>(active).expect("active decodes"),
            cycle::CurrentCycle::Active(_)
        ));

        let idle = r#"{"status": "no_active_cycle"}"#;
        assert!(matches!(
            serde_json::from_str::<cycle::CurrentCycle>(idle).expect("sentinel decodes"),
            cycle::CurrentCycle::None { .. }
        ));
    }

    #[test]
    fn cycle_analysis_tolerates_uncategorized_breakdown() {
        let raw = r#"{
            "cycle_id": 3,
            "start_date": "2024-01-01T00:00:00",
            "end_date": null,
            "is_active": true,
            "total_spent": 900.0,
            "total_budget": 3000.0,
            "remaining_budget": 2100.0,
            "budget_percentage_used": 30.0,
            "transaction_count": 12,
            "average_transaction": 75.0,
            "category_breakdown": [
                {"category": null, "spent": 200.0, "limit": null,
                 "percentage_of_total": 22.2, "percentage_of_limit": null}
            ],
            "top_merchants": [{"merchant": "Tamimi Markets", "spent": 400.0}]
        }"#;
        let analysis: cycle::CycleAnalysis = serde_json::from_str(raw).expect("analysis decodes");
        assert_eq!(analysis.category_breakdown.len(), 1);
        assert!(analysis.category_breakdown[0].category.is_none());
    }

    #[test]
    fn sms_response_processed_sentinel() {
        let ok = r#"{"status": "SMS processed", "extraction_status": "failed", "data": {
            "amount": null, "merchant": null, "classification": null,
            "main_category": null, "sub_category": null,
            "raw_invoice": "hello", "extraction_status": "failed"
        }}"#;
        let response: sms::SmsResponse = serde_json::from_str(ok).expect("response decodes");
        assert!(response.processed());

        let odd: sms::SmsResponse =
            serde_json::from_str(r#"{"status": "queued"}"#).expect("bare status decodes");
        assert!(!odd.processed());
    }
}
