use crate::errors::RegistryError;
use crate::models::{registry_items, CompanySummary, Director};
use crate::registry_client::RegistryClient;
use crate::sanitize::sanitize_text_field;
use serde_json::Value;

/// Company and director lookups on top of the registry client.
///
/// The plain operations are fail-soft: any registry failure is logged and
/// reported as an empty list. The `try_*` operations return the failure.
#[derive(Clone)]
pub struct LookupService {
    registry: RegistryClient,
}

impl LookupService {
    pub fn new(registry: RegistryClient) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Search companies whose name starts with `term`.
    pub async fn search_companies(&self, term: &str) -> Vec<CompanySummary> {
        self.try_search_companies(term).await.unwrap_or_else(|e| {
            tracing::warn!(
                "Company search collapsed to no results ({}): {}",
                e.kind(),
                e
            );
            Vec::new()
        })
    }

    /// Search companies, surfacing registry failures.
    pub async fn try_search_companies(
        &self,
        term: &str,
    ) -> Result<Vec<CompanySummary>, RegistryError> {
        let term = sanitize_text_field(term);
        if term.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!("Searching registry for companies matching '{}'", term);
        let response = self
            .registry
            .request(&["search", "companies"], &[("q", term.as_str())])
            .await?;

        let companies = filter_companies(&term, &response);
        tracing::info!(
            "Registry search for '{}' returned {} matching companies",
            term,
            companies.len()
        );
        Ok(companies)
    }

    /// Directors of the company registered under `company_number`.
    pub async fn list_directors(&self, company_number: &str) -> Vec<Director> {
        self.try_list_directors(company_number)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Director lookup collapsed to no results ({}): {}",
                    e.kind(),
                    e
                );
                Vec::new()
            })
    }

    /// Director lookup, surfacing registry failures.
    pub async fn try_list_directors(
        &self,
        company_number: &str,
    ) -> Result<Vec<Director>, RegistryError> {
        let company_number = sanitize_text_field(company_number);
        if company_number.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!("Fetching officers for company {}", company_number);
        let response = self
            .registry
            .request(&["company", company_number.as_str(), "officers"], &[])
            .await?;

        let directors = filter_directors(&response);
        tracing::info!(
            "Company {} has {} director records",
            company_number,
            directors.len()
        );
        Ok(directors)
    }
}

/// Keeps the search items whose title starts with `term`, ignoring case.
///
/// The registry ranks by relevance, so its results include names that merely
/// contain the term; those are dropped here.
pub fn filter_companies(term: &str, response: &Value) -> Vec<CompanySummary> {
    let prefix = term.to_lowercase();
    registry_items(response)
        .iter()
        .filter(|item| item.is_object())
        .map(CompanySummary::from_registry_item)
        .filter(|company| company.company_name.to_lowercase().starts_with(&prefix))
        .collect()
}

/// Keeps the officers whose role mentions "director".
pub fn filter_directors(response: &Value) -> Vec<Director> {
    registry_items(response)
        .iter()
        .filter(|item| item.is_object())
        .map(Director::from_registry_item)
        .filter(|director| director.role.to_lowercase().contains("director"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_companies_prefix_only() {
        let response = json!({
            "items": [
                {"title": "Acme Ltd", "company_number": "123", "company_status": "active"},
                {"title": "Other Co", "company_number": "456", "company_status": "active"},
                {"title": "The Acme Group", "company_number": "789"}
            ]
        });
        let companies = filter_companies("Acme", &response);
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].company_name, "Acme Ltd");
        assert_eq!(companies[0].company_number, "123");
    }

    #[test]
    fn test_filter_companies_case_insensitive() {
        let response = json!({"items": [{"title": "ACME HOLDINGS PLC"}]});
        assert_eq!(filter_companies("acme", &response).len(), 1);
    }

    #[test]
    fn test_filter_companies_skips_items_without_title() {
        let response = json!({"items": [{"company_number": "1"}, "junk", 42]});
        assert!(filter_companies("Ac", &response).is_empty());
    }

    #[test]
    fn test_filter_directors_by_role() {
        let response = json!({
            "items": [
                {"name": "Jane Doe", "officer_role": "Director", "resigned_on": null},
                {"name": "Bob", "officer_role": "Secretary"},
                {"name": "Corp Ltd", "officer_role": "corporate-director", "appointed_on": "2019-05-01"},
                {"name": "Nominee", "officer_role": "nominee-director", "resigned_on": "2021-03-04"}
            ]
        });
        let directors = filter_directors(&response);
        let names: Vec<&str> = directors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "Corp Ltd", "Nominee"]);
        assert_eq!(directors[0].role, "Director");
        assert_eq!(directors[2].resigned_on, "2021-03-04");
    }

    #[test]
    fn test_filter_directors_missing_role_excluded() {
        let response = json!({"items": [{"name": "No Role"}]});
        assert!(filter_directors(&response).is_empty());
    }
}
