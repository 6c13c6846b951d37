use crate::debounce::Debouncer;
use crate::form_state::{CompanyDropdown, CompanyLookupForm, FieldMap, InputAction};
use crate::lookup_client::LookupClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Drives a [`CompanyLookupForm`] against the lookup endpoints.
///
/// Keystrokes go through the debouncer; responses are applied to the shared
/// form state, which discards any that arrive out of order.
pub struct FormController {
    form: Arc<Mutex<CompanyLookupForm>>,
    client: LookupClient,
    debouncer: Debouncer,
}

impl FormController {
    pub fn new(fields: FieldMap, client: LookupClient) -> Self {
        Self {
            form: Arc::new(Mutex::new(CompanyLookupForm::new(fields))),
            client,
            debouncer: Debouncer::default(),
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    pub fn form(&self) -> Arc<Mutex<CompanyLookupForm>> {
        Arc::clone(&self.form)
    }

    /// Snapshot of the current form state.
    pub async fn snapshot(&self) -> CompanyLookupForm {
        self.form.lock().await.clone()
    }

    pub async fn on_input(&mut self, text: &str) {
        let action = self.form.lock().await.on_input(text);

        match action {
            InputAction::Cleared => self.debouncer.cancel(),
            InputAction::Debounce(term) => {
                let form = Arc::clone(&self.form);
                let client = self.client.clone();
                self.debouncer.schedule(async move {
                    let Some(ticket) = form.lock().await.dispatch_search(term) else {
                        return;
                    };
                    let result = client.search_companies(&ticket.term).await;
                    form.lock().await.apply_search(&ticket, result);
                });
            }
        }
    }

    /// Waits until the dropdown shows results or a message, up to `timeout`.
    pub async fn wait_for_search(&self, timeout: Duration) -> CompanyDropdown {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let dropdown = self.form.lock().await.dropdown().clone();
            let settled = matches!(
                dropdown,
                CompanyDropdown::Matches(_) | CompanyDropdown::Message(_)
            );
            if settled || tokio::time::Instant::now() >= deadline {
                return dropdown;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Selects a match and loads its directors.
    ///
    /// Returns false if there was nothing to select, no directors field, or
    /// the response was superseded by a later selection.
    pub async fn select_company(&self, index: usize) -> bool {
        let Some(ticket) = self.form.lock().await.select_company(index) else {
            return false;
        };

        let result = self.client.list_directors(&ticket.company_number).await;
        self.form.lock().await.apply_directors(&ticket, result)
    }
}
