//! Composable search criteria for customers.
//!
//! Each recognized query parameter contributes one independent filter over a
//! customer record; the active filters are combined with logical AND. The
//! filters are a closed set of tagged variants rather than opaque closures,
//! so they can be inspected, translated to a store query, and tested in
//! isolation.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use super::Customer;

/// Date format accepted by the `born_after` parameter.
pub const BORN_AFTER_FORMAT: &str = "%Y-%m-%d";

/// Text fields a substring filter can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// Any of first name, last name, display name
    Name,
    Username,
    Email,
}

/// Date fields a range filter can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Birthdate,
}

/// One independent filter over a customer record.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Case-insensitive literal substring match.
    SubstringMatch { field: TextField, value: String },
    /// Inclusive lower bound on a date field.
    DateAtOrAfter { field: DateField, value: NaiveDate },
}

impl Filter {
    /// Evaluate this filter against a single customer record.
    ///
    /// Both sides of a substring match are lower-cased here rather than
    /// relying on store collation. This is the reference semantics the
    /// repository's SQL translation must agree with.
    pub fn matches(&self, customer: &Customer) -> bool {
        match self {
            Filter::SubstringMatch { field, value } => {
                let needle = value.to_lowercase();
                match field {
                    TextField::Name => {
                        contains_ci(customer.first_name.as_deref(), &needle)
                            || contains_ci(Some(&customer.last_name), &needle)
                            || contains_ci(customer.display_name.as_deref(), &needle)
                    }
                    TextField::Username => contains_ci(customer.username.as_deref(), &needle),
                    TextField::Email => contains_ci(customer.email.as_deref(), &needle),
                }
            }
            Filter::DateAtOrAfter { field, value } => match field {
                DateField::Birthdate => customer.birthdate.map_or(false, |born| born >= *value),
            },
        }
    }
}

/// Substring containment against an optional field; absent fields never match.
fn contains_ci(haystack: Option<&str>, lowercased_needle: &str) -> bool {
    haystack.map_or(false, |text| text.to_lowercase().contains(lowercased_needle))
}

/// No usable filter criteria were given.
///
/// A search with zero filters is a client error, never an unrestricted scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No usable search criteria given")]
pub struct EmptySearch;

/// Conjunction of one or more filters.
///
/// Filters are commutative and associative under AND and have no side
/// effects, so the parameter insertion order never affects the result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    filters: Vec<Filter>,
}

impl SearchCriteria {
    /// Build combined search criteria from raw query parameters.
    ///
    /// Recognized parameters: `name`, `username`, `email` (substring
    /// matches) and `born_after` (inclusive date lower bound, `YYYY-MM-DD`).
    /// Absent and empty values are ignored. An unparsable `born_after` is
    /// dropped with a diagnostic while the remaining filters still apply.
    /// Unrecognized parameters are ignored.
    pub fn compose(params: &HashMap<String, String>) -> Result<Self, EmptySearch> {
        let mut filters = Vec::new();

        for (field, param) in [
            (TextField::Name, "name"),
            (TextField::Username, "username"),
            (TextField::Email, "email"),
        ] {
            if let Some(value) = non_empty(params, param) {
                tracing::debug!("{}={}", param, value);
                filters.push(Filter::SubstringMatch {
                    field,
                    value: value.to_string(),
                });
            }
        }

        if let Some(raw) = non_empty(params, "born_after") {
            match NaiveDate::parse_from_str(raw, BORN_AFTER_FORMAT) {
                Ok(value) => {
                    tracing::debug!("born_after={}", value);
                    filters.push(Filter::DateAtOrAfter {
                        field: DateField::Birthdate,
                        value,
                    });
                }
                // A single bad filter is dropped, not the whole search
                Err(_) => tracing::warn!("Can't parse date {}", raw),
            }
        }

        if filters.is_empty() {
            return Err(EmptySearch);
        }

        Ok(Self { filters })
    }

    /// The active filters, in the order they were recognized.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Evaluate the conjunction of all filters against one record.
    pub fn matches(&self, customer: &Customer) -> bool {
        self.filters.iter().all(|filter| filter.matches(customer))
    }
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|value| !value.is_empty())
}
