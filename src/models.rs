use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

// ============ Lookup Results ============

/// A company matching a name search.
///
/// Built from one `items[]` entry of the registry's search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    /// Registration number, e.g. "00000006".
    pub company_number: String,
    /// Registered name; always starts with the search term.
    pub company_name: String,
    /// Registry status such as "active" or "dissolved".
    pub status: String,
    /// One-line registered office address.
    pub address_snippet: String,
    /// Incorporation date as an ISO date, or empty.
    pub date_of_creation: String,
}

impl CompanySummary {
    /// Maps a registry search item, defaulting missing fields to empty strings.
    pub fn from_registry_item(item: &Value) -> Self {
        Self {
            company_number: string_field(item, "company_number"),
            company_name: string_field(item, "title"),
            status: string_field(item, "company_status"),
            address_snippet: string_field(item, "address_snippet"),
            date_of_creation: string_field(item, "date_of_creation"),
        }
    }
}

/// An officer of a company whose role is some kind of director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    pub name: String,
    /// Officer role exactly as the registry reports it, e.g. "director".
    pub role: String,
    pub appointed_on: String,
    /// Resignation date, empty while the director is still serving.
    #[serde(default)]
    pub resigned_on: String,
}

impl Director {
    pub fn from_registry_item(item: &Value) -> Self {
        Self {
            name: string_field(item, "name"),
            role: string_field(item, "officer_role"),
            appointed_on: string_field(item, "appointed_on"),
            resigned_on: string_field(item, "resigned_on"),
        }
    }

    /// True while no resignation date is recorded.
    pub fn is_active(&self) -> bool {
        self.resigned_on.trim().is_empty()
    }
}

/// Reads a string field from a registry item; anything else becomes "".
fn string_field(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Borrows the `items` array of a registry response, if it has one.
pub fn registry_items(response: &Value) -> &[Value] {
    response
        .get("items")
        .and_then(|items| items.as_array())
        .map(|items| items.as_slice())
        .unwrap_or_default()
}

// ============ Endpoint Payloads ============

/// Body of `POST /api/v1/companies/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchCompaniesRequest {
    /// Token issued by `GET /api/v1/security-token`.
    #[serde(default, alias = "nonce")]
    pub security_token: Option<String>,
    /// Company name prefix, at least 2 characters.
    #[serde(default)]
    pub search: Option<String>,
}

/// Body of `POST /api/v1/companies/directors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListDirectorsRequest {
    #[serde(default, alias = "nonce")]
    pub security_token: Option<String>,
    #[serde(default, alias = "company_number")]
    pub company_number: Option<String>,
}

/// Response envelope shared by both lookup endpoints.
///
/// `data` is present only on success, `message` only on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[aliases(CompanyEnvelope = LookupEnvelope<CompanySummary>, DirectorEnvelope = LookupEnvelope<Director>)]
pub struct LookupEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> LookupEnvelope<T> {
    pub fn success(data: Vec<T>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The result list when the envelope is a success with at least one entry.
    pub fn into_results(self) -> Option<Vec<T>> {
        match (self.success, self.data) {
            (true, Some(data)) if !data.is_empty() => Some(data),
            _ => None,
        }
    }
}

/// Response of `GET /api/v1/security-token`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurityTokenResponse {
    pub security_token: String,
    /// Scope the token is valid for.
    pub action: String,
    /// Guaranteed minimum remaining validity.
    pub valid_for_secs: u64,
}

/// Query of `GET /api/v1/settings/display`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DisplayQuery {
    /// Optional label rendered before the masked key.
    pub label: Option<String>,
}
