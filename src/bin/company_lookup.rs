//! Walks the company lookup form flow against a running server.
//!
//! Usage: `company-lookup <search term> [match index]`
//!
//! The server address is read from `LOOKUP_SERVER_URL` (default
//! `http://localhost:3000`).

use companies_house_lookup::form_controller::FormController;
use companies_house_lookup::form_state::{CompanyDropdown, FieldMap, FieldRole, FormField};
use companies_house_lookup::lookup_client::LookupClient;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Main entry point for the lookup walkthrough.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "companies_house_lookup=info".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let term = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: company-lookup <search term> [match index]"))?;
    let index: usize = match args.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("match index must be a whole number"))?,
        None => 0,
    };

    let server = env::var("LOOKUP_SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = LookupClient::connect(&server).await?;

    let fields = FieldMap::resolve(&[
        FormField::new("input_1_1", &["gf-company-search"]),
        FormField::new("input_1_2", &["gf-company-registration"]),
        FormField::new("input_1_4", &["gf-company-incorporation"]),
        FormField::new("input_1_3", &["gf-directors-dropdown"]),
    ]);
    let mut controller = FormController::new(fields, client);

    controller.on_input(&term).await;
    let companies = match controller.wait_for_search(Duration::from_secs(35)).await {
        CompanyDropdown::Matches(companies) => companies,
        CompanyDropdown::Message(message) => {
            println!("{}", message);
            return Ok(());
        }
        _ => {
            println!("Search term too short or no response");
            return Ok(());
        }
    };

    println!("Companies matching '{}':", term);
    for (i, company) in companies.iter().enumerate() {
        println!(
            "  [{}] {} ({}, {})",
            i, company.company_name, company.company_number, company.status
        );
    }

    if !controller.select_company(index).await {
        println!("No match at index {}", index);
        return Ok(());
    }

    let form = controller.snapshot().await;
    for role in FieldRole::ALL {
        if let Some(field) = form.field(role) {
            println!("{:?}: {}", role, field.value);
        }
    }

    let directors = form.directors();
    println!(
        "Directors{}:",
        if directors.disabled { " (disabled)" } else { "" }
    );
    for option in &directors.options {
        let marker = if directors.selected.as_deref() == Some(option.value.as_str()) {
            "*"
        } else {
            " "
        };
        println!(" {} {}", marker, option.label);
    }

    Ok(())
}
