//! Scripted walk through a sub-form session.
//!
//! Builds an order page with two server-rendered items, edits it the way a
//! user would and prints what the browser would submit. Pass a postal code
//! as the first argument to also run the address autofill against the
//! postal service.

mod page;

use std::env;
use std::error::Error;
use std::fs::File;

use log::info;
use regex::Regex;
use serde_json::json;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use subform::listview::{ColumnDefinition, ListViewConfig};
use subform::prelude::*;
use subform_lookup::{AddressAutofill, LookupClient};

#[tokio::main]
async fn main() {
    let log_file = File::create("subform-demo.log").expect("Failed to create log file");
    CombinedLogger::init(vec![
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
        TermLogger::new(LevelFilter::Warn, Config::default(), TerminalMode::Stderr, ColorChoice::Auto),
    ])
    .expect("Failed to initialize logger");

    if let Err(e) = run(env::args().nth(1)).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(zip: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut doc = page::order_page();

    let validator = Validator::new()
        .field("description")
        .required_default()
        .field("quantity")
        .required_default()
        .pattern(regex_digits()?, "Informe um número")
        .finish();
    let config = RegistryConfig::new("items")
        .with_modal("itemModal")
        .with_update_button("updateButton")
        .with_holder("editingHash")
        .with_delete_confirmation(Confirmation::new("confirmDeletion", "confirmDelete"))
        .with_validator(validator)
        .with_column(TableColumn::field("Description", "description"))
        .with_column(TableColumn::field("Qty", "quantity"));

    let mut registry = SubformRegistry::setup(&mut doc, config)?;
    registry.rehydrate(&mut doc)?;

    // A rejected add: quantity is not a number.
    page::fill_item(&mut doc, "Gasket", "a few")?;
    registry.dispatch(&mut doc, &Event::click("addButton"))?;
    info!("records after rejected add: {}", registry.len());

    page::fill_item(&mut doc, "Gasket", "12")?;
    registry.dispatch(&mut doc, &Event::click("addButton"))?;

    registry.dispatch(&mut doc, &Event::click("edit-h2"))?;
    doc.set_value("quantity", "8")?;
    registry.dispatch(&mut doc, &Event::click("updateButton"))?;

    registry.dispatch(&mut doc, &Event::click("delete-h1"))?;
    registry.dispatch(&mut doc, &Event::click("confirmDelete"))?;

    let pairs = doc.form_data("form")?;
    let submitted = SubmittedRecords::from_pairs("items", "deletedHashes", "updatedHashes", &pairs)?;

    let list = ListViewConfig::new(
        "/app/orders/",
        vec![
            ColumnDefinition::new("number"),
            ColumnDefinition::non_sortable_searchable("customer"),
            ColumnDefinition::update_action("/app/orders"),
            ColumnDefinition::delete_action("hash"),
        ],
    )
    .with_context_path("/app/");

    let report = json!({
        "submitted": pairs
            .iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect::<Vec<_>>(),
        "records": submitted.records,
        "deleted": submitted.deleted,
        "updated": submitted.updated,
        "listView": list.to_json()?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(zip) = zip {
        autofill(&mut doc, &zip).await?;
    }

    Ok(())
}

async fn autofill(doc: &mut Document, zip: &str) -> Result<(), Box<dyn Error>> {
    let base = env::var("SUBFORM_DEMO_BASE_URL").unwrap_or_else(|_| "http://localhost:8080/app".to_string());
    let client = LookupClient::builder().base_url(base).build()?;

    doc.set_value("zipCode", zip)?;
    let mut autofill = AddressAutofill::new();
    match autofill.handle(&client, doc, &Event::focus_out("zipCode")).await {
        Ok(Some(address)) => println!(
            "{} {}, {} - {}/{}",
            address.zip_code, address.street, address.neighborhood, address.city, address.state
        ),
        Ok(None) => println!("no postal code given"),
        Err(e) => eprintln!("postal lookup failed: {}", e),
    }
    Ok(())
}

fn regex_digits() -> Result<Regex, regex::Error> {
    Regex::new(r"^\d+$")
}
