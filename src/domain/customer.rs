//! Customer domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Serde helpers for the contractual `YYYY-MM-DD HH:mm:ss` timestamp form.
///
/// `created_at` crosses the API boundary in this exact textual shape even
/// though it is a proper `DateTime<Utc>` internally.
pub mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)?;
        Ok(naive.and_utc())
    }
}

/// Customer domain entity (persisted record).
///
/// `id` and `created_at` are assigned by the system at first persistence
/// and never altered afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub display_name: Option<String>,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    pub birthdate: Option<NaiveDate>,
}

/// Candidate customer record, before validation and persistence.
///
/// Everything is optional here: the validation pipeline decides what is
/// acceptable and the defaulting step fills in the system-assigned fields.
/// There is no `id`; that only exists once a record has been stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    /// Normally absent; the defaulting step overwrites it unconditionally
    /// at creation. Validated as strictly-past when supplied out-of-band.
    pub created_at: Option<DateTime<Utc>>,
    pub birthdate: Option<NaiveDate>,
}

impl From<Customer> for CustomerDraft {
    fn from(customer: Customer) -> Self {
        Self {
            username: customer.username,
            email: customer.email,
            first_name: customer.first_name,
            last_name: Some(customer.last_name),
            display_name: customer.display_name,
            created_at: Some(customer.created_at),
            birthdate: customer.birthdate,
        }
    }
}

/// Customer creation request body.
///
/// `id` and `created_at` are deliberately absent: both are system-assigned.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    /// Unique username, at most 100 characters
    #[schema(example = "sjshephard001")]
    pub username: Option<String>,
    /// Unique email address, at most 100 characters
    #[schema(example = "stephen@example.com")]
    pub email: Option<String>,
    /// First name, at most 25 characters
    #[schema(example = "Stephen")]
    pub first_name: Option<String>,
    /// Last name, required, at most 25 characters
    #[schema(example = "Shephard")]
    pub last_name: Option<String>,
    /// Display name, at most 60 characters; computed from first and last
    /// name when omitted
    #[schema(example = "Stephen Shephard")]
    pub display_name: Option<String>,
    /// Date of birth, formatted YYYY-MM-DD
    #[schema(example = "1980-11-08")]
    pub birthdate: Option<NaiveDate>,
}

impl From<CreateCustomerRequest> for CustomerDraft {
    fn from(request: CreateCustomerRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            display_name: request.display_name,
            created_at: None,
            birthdate: request.birthdate,
        }
    }
}

/// Customer update request body.
///
/// Only this bounded subset of fields is ever overwritten by an update.
/// Absent fields keep their stored values; an update cannot clear a field.
/// `display_name` and `birthdate` are left at their stored values, and
/// `id`/`created_at` are never touched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    /// New first name
    #[schema(example = "Stephen")]
    pub first_name: Option<String>,
    /// New last name
    #[schema(example = "Shephard")]
    pub last_name: Option<String>,
    /// New email address
    #[schema(example = "stephen@example.com")]
    pub email: Option<String>,
    /// New username
    #[schema(example = "sjshephard001")]
    pub username: Option<String>,
}

/// Customer response (wire representation).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerResponse {
    /// Unique customer identifier, assigned at creation
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "sjshephard001")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "stephen@example.com")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Stephen")]
    pub first_name: Option<String>,
    #[schema(example = "Shephard")]
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Stephen Shephard")]
    pub display_name: Option<String>,
    /// Creation timestamp, formatted YYYY-MM-DD HH:mm:ss
    #[serde(with = "timestamp_format")]
    #[schema(example = "2016-11-08 22:18:03", value_type = String)]
    pub created_at: DateTime<Utc>,
    /// Date of birth, formatted YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "1980-11-08")]
    pub birthdate: Option<NaiveDate>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            username: customer.username,
            email: customer.email,
            first_name: customer.first_name,
            last_name: customer.last_name,
            display_name: customer.display_name,
            created_at: customer.created_at,
            birthdate: customer.birthdate,
        }
    }
}

/// Envelope for search results.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerSearchResponse {
    pub customers: Vec<CustomerResponse>,
}

impl From<Vec<Customer>> for CustomerSearchResponse {
    fn from(customers: Vec<Customer>) -> Self {
        Self {
            customers: customers.into_iter().map(CustomerResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_customer() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            username: Some("sjshephard001".to_string()),
            email: Some("stephen@example.com".to_string()),
            first_name: Some("Stephen".to_string()),
            last_name: "Shephard".to_string(),
            display_name: Some("Stephen Shephard".to_string()),
            created_at: Utc.with_ymd_and_hms(2016, 11, 8, 22, 18, 3).unwrap(),
            birthdate: NaiveDate::from_ymd_opt(1980, 11, 8),
        }
    }

    #[test]
    fn created_at_serializes_in_contractual_form() {
        let response = CustomerResponse::from(sample_customer());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["created_at"], "2016-11-08 22:18:03");
    }

    #[test]
    fn birthdate_serializes_as_date_only() {
        let response = CustomerResponse::from(sample_customer());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["birthdate"], "1980-11-08");
    }

    #[test]
    fn timestamp_round_trips_through_text() {
        let customer = sample_customer();
        let json = serde_json::to_string(&customer).unwrap();
        let parsed: Customer = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.created_at, customer.created_at);
    }

    #[test]
    fn create_request_never_carries_created_at() {
        let request = CreateCustomerRequest {
            last_name: Some("Shephard".to_string()),
            ..Default::default()
        };
        let draft = CustomerDraft::from(request);

        assert!(draft.created_at.is_none());
    }
}
