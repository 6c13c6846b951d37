//! State of the company lookup form as the browser widget sees it.
//!
//! The form owns four fields (company name, registration number,
//! incorporation date and the directors select) plus the company search
//! dropdown. Every search and directors fetch is stamped with a sequence
//! number when dispatched; a response is applied only if it carries the
//! latest number, so a slow early response never overwrites a newer one.

use crate::models::{CompanySummary, Director, LookupEnvelope};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::Display;

/// Minimum input length before a search is scheduled.
pub const MIN_INPUT_LEN: usize = 2;

pub const SELECT_COMPANY_FIRST: &str = "Select a company first";
pub const LOADING_DIRECTORS: &str = "Loading directors...";
pub const NO_DIRECTORS_FOUND: &str = "No directors found";
pub const FAILED_TO_LOAD_DIRECTORS: &str = "Failed to load directors";
pub const NO_COMPANIES_FOUND: &str = "No companies found";
pub const SEARCH_FAILED: &str = "Search failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    CompanyName,
    RegistrationNumber,
    IncorporationDate,
    Directors,
}

impl FieldRole {
    pub const ALL: [FieldRole; 4] = [
        FieldRole::CompanyName,
        FieldRole::RegistrationNumber,
        FieldRole::IncorporationDate,
        FieldRole::Directors,
    ];

    /// CSS class the host form puts on the field's container.
    pub fn css_class(self) -> &'static str {
        match self {
            FieldRole::CompanyName => "gf-company-search",
            FieldRole::RegistrationNumber => "gf-company-registration",
            FieldRole::IncorporationDate => "gf-company-incorporation",
            FieldRole::Directors => "gf-directors-dropdown",
        }
    }

    /// Id suffix used when the form was built without the CSS classes.
    fn fallback_id_suffix(self) -> Option<&'static str> {
        match self {
            FieldRole::CompanyName => Some("_1"),
            FieldRole::Directors => Some("_3"),
            _ => None,
        }
    }
}

/// A field as described by the host form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: String,
    pub css_classes: Vec<String>,
}

impl FormField {
    pub fn new(id: impl Into<String>, css_classes: &[&str]) -> Self {
        Self {
            id: id.into(),
            css_classes: css_classes.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Field role → field id, resolved once when the form is set up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    ids: HashMap<FieldRole, String>,
}

impl FieldMap {
    /// Matches each role by CSS class first, then by the `input_<form>_<n>` id.
    pub fn resolve(fields: &[FormField]) -> Self {
        let mut ids = HashMap::new();

        for role in FieldRole::ALL {
            let by_class = fields
                .iter()
                .find(|f| f.css_classes.iter().any(|c| c == role.css_class()));

            let by_id = || {
                let suffix = role.fallback_id_suffix()?;
                fields
                    .iter()
                    .find(|f| f.id.starts_with("input_") && f.id.ends_with(suffix))
            };

            if let Some(field) = by_class.or_else(by_id) {
                ids.insert(role, field.id.clone());
            }
        }

        Self { ids }
    }

    pub fn id(&self, role: FieldRole) -> Option<&str> {
        self.ids.get(&role).map(String::as_str)
    }

    pub fn has(&self, role: FieldRole) -> bool {
        self.ids.contains_key(&role)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValue {
    pub value: String,
    pub readonly: bool,
}

/// What the company search dropdown currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyDropdown {
    Hidden,
    Searching,
    Matches(Vec<CompanySummary>),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
        }
    }

    fn director(director: &Director) -> Self {
        Self {
            value: director.name.clone(),
            label: format!("{} ({})", director.name, director.role),
        }
    }
}

/// The directors `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorsSelect {
    pub options: Vec<SelectOption>,
    /// Value of the selected option; `None` leaves the first option showing.
    pub selected: Option<String>,
    pub disabled: bool,
}

impl DirectorsSelect {
    fn placeholder(label: &str, disabled: bool) -> Self {
        Self {
            options: vec![SelectOption::placeholder(label)],
            selected: None,
            disabled,
        }
    }

    /// Builds the select from a directors response, keeping active directors only.
    ///
    /// One active director is selected outright; several get a count
    /// placeholder in front of them.
    pub fn from_directors(directors: &[Director]) -> Self {
        let active: Vec<&Director> = directors.iter().filter(|d| d.is_active()).collect();

        match active.as_slice() {
            [] => Self::placeholder(NO_DIRECTORS_FOUND, true),
            [only] => Self {
                options: vec![SelectOption::director(only)],
                selected: Some(only.name.clone()),
                disabled: false,
            },
            many => {
                let mut options = Vec::with_capacity(many.len() + 1);
                options.push(SelectOption::placeholder(format!(
                    "{} directors found",
                    many.len()
                )));
                options.extend(many.iter().map(|d| SelectOption::director(d)));
                Self {
                    options,
                    selected: None,
                    disabled: false,
                }
            }
        }
    }
}

/// A dispatched company search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub term: String,
}

/// A dispatched directors fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorsTicket {
    pub seq: u64,
    pub company_number: String,
}

/// What to do after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Too short; dropdown cleared and nothing scheduled.
    Cleared,
    /// Schedule a debounced search for this term.
    Debounce(String),
}

#[derive(Debug, Clone)]
pub struct CompanyLookupForm {
    fields: FieldMap,
    values: HashMap<FieldRole, FieldValue>,
    dropdown: CompanyDropdown,
    directors: DirectorsSelect,
    selected_company: Option<CompanySummary>,
    change_notifications: u64,
    search_seq: u64,
    directors_seq: u64,
}

impl CompanyLookupForm {
    pub fn new(fields: FieldMap) -> Self {
        let mut values = HashMap::new();
        for role in FieldRole::ALL {
            if fields.has(role) {
                let readonly = matches!(
                    role,
                    FieldRole::RegistrationNumber | FieldRole::IncorporationDate
                );
                values.insert(
                    role,
                    FieldValue {
                        value: String::new(),
                        readonly,
                    },
                );
            }
        }

        Self {
            fields,
            values,
            dropdown: CompanyDropdown::Hidden,
            directors: DirectorsSelect::placeholder(SELECT_COMPANY_FIRST, true),
            selected_company: None,
            change_notifications: 0,
            search_seq: 0,
            directors_seq: 0,
        }
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn field(&self, role: FieldRole) -> Option<&FieldValue> {
        self.values.get(&role)
    }

    pub fn dropdown(&self) -> &CompanyDropdown {
        &self.dropdown
    }

    pub fn directors(&self) -> &DirectorsSelect {
        &self.directors
    }

    pub fn selected_company(&self) -> Option<&CompanySummary> {
        self.selected_company.as_ref()
    }

    /// How many change notifications the directors select has emitted.
    pub fn change_notifications(&self) -> u64 {
        self.change_notifications
    }

    fn set_field(&mut self, role: FieldRole, value: String, readonly: bool) {
        if let Some(field) = self.values.get_mut(&role) {
            field.value = value;
            field.readonly = readonly;
        }
    }

    /// Records a keystroke in the company name field.
    pub fn on_input(&mut self, text: &str) -> InputAction {
        if let Some(field) = self.values.get_mut(&FieldRole::CompanyName) {
            field.value = text.to_string();
        }

        if text.chars().count() < MIN_INPUT_LEN {
            self.dropdown = CompanyDropdown::Hidden;
            // Any search still in flight is now stale
            self.search_seq += 1;
            return InputAction::Cleared;
        }

        InputAction::Debounce(text.to_string())
    }

    /// Marks a search as sent; the dropdown shows the searching notice.
    ///
    /// Returns `None` when the company field no longer holds `term` or is too
    /// short, e.g. after a keystroke that landed while the debounce fired.
    pub fn dispatch_search(&mut self, term: impl Into<String>) -> Option<SearchTicket> {
        let term = term.into();
        let current = self
            .values
            .get(&FieldRole::CompanyName)
            .map(|field| field.value.as_str());

        if term.chars().count() < MIN_INPUT_LEN || current.is_some_and(|value| value != term) {
            tracing::debug!("Not dispatching search for '{}': input has changed", term);
            return None;
        }

        self.search_seq += 1;
        self.dropdown = CompanyDropdown::Searching;
        Some(SearchTicket {
            seq: self.search_seq,
            term,
        })
    }

    /// Applies a search response. Returns false if a newer search superseded it.
    pub fn apply_search<E: Display>(
        &mut self,
        ticket: &SearchTicket,
        result: Result<LookupEnvelope<CompanySummary>, E>,
    ) -> bool {
        if ticket.seq != self.search_seq {
            tracing::debug!(
                "Dropping stale search response for '{}' (seq {} < {})",
                ticket.term,
                ticket.seq,
                self.search_seq
            );
            return false;
        }

        self.dropdown = match result {
            Ok(envelope) => match envelope.into_results() {
                Some(companies) => CompanyDropdown::Matches(companies),
                None => CompanyDropdown::Message(NO_COMPANIES_FOUND.to_string()),
            },
            Err(e) => {
                tracing::warn!("Company search request failed: {}", e);
                CompanyDropdown::Message(SEARCH_FAILED.to_string())
            }
        };
        true
    }

    /// Picks the `index`-th match from the dropdown.
    ///
    /// Fills and locks the registration and incorporation fields, hides the
    /// dropdown and returns the directors fetch to run, if the form has a
    /// directors field.
    pub fn select_company(&mut self, index: usize) -> Option<DirectorsTicket> {
        let company = match &self.dropdown {
            CompanyDropdown::Matches(companies) => companies.get(index)?.clone(),
            _ => return None,
        };

        self.set_field(FieldRole::CompanyName, company.company_name.clone(), false);
        self.set_field(
            FieldRole::RegistrationNumber,
            company.company_number.clone(),
            true,
        );
        self.set_field(
            FieldRole::IncorporationDate,
            format_long_date(&company.date_of_creation),
            true,
        );
        self.dropdown = CompanyDropdown::Hidden;
        let company_number = company.company_number.clone();
        self.selected_company = Some(company);

        if !self.fields.has(FieldRole::Directors) {
            return None;
        }

        self.directors_seq += 1;
        self.directors.options = vec![SelectOption::placeholder(LOADING_DIRECTORS)];
        self.directors.selected = None;

        Some(DirectorsTicket {
            seq: self.directors_seq,
            company_number,
        })
    }

    /// Applies a directors response. Returns false if a newer fetch superseded it.
    pub fn apply_directors<E: Display>(
        &mut self,
        ticket: &DirectorsTicket,
        result: Result<LookupEnvelope<Director>, E>,
    ) -> bool {
        if ticket.seq != self.directors_seq {
            tracing::debug!(
                "Dropping stale directors response for {}",
                ticket.company_number
            );
            return false;
        }

        match result {
            Ok(envelope) => match envelope.into_results() {
                Some(directors) => {
                    self.directors = DirectorsSelect::from_directors(&directors);
                    self.change_notifications += 1;
                }
                None => {
                    self.directors = DirectorsSelect::placeholder(NO_DIRECTORS_FOUND, true);
                }
            },
            Err(e) => {
                tracing::warn!("Directors request failed: {}", e);
                self.directors = DirectorsSelect::placeholder(FAILED_TO_LOAD_DIRECTORS, true);
            }
        }
        true
    }
}

/// Formats an ISO date as e.g. "1 January 2020".
///
/// Empty input gives an empty string; anything that is not a date is
/// returned unchanged.
pub fn format_long_date(iso: &str) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return String::new();
    }

    let date_part = iso.get(..10).unwrap_or(iso);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%-d %B %Y").to_string(),
        Err(_) => iso.to_string(),
    }
}
