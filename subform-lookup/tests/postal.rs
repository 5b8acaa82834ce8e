//! Postal-code autofill tests.
//!
//! The live lookup is ignored by default. To run it, optionally create a
//! `.env` file in the subform-lookup directory with:
//!
//! ```env
//! LOOKUP_POSTAL_BASE_URL=https://viacep.com.br/ws
//! LOOKUP_ZIP_CODE=01001-000
//! ```
//!
//! Then run: `cargo test -p subform-lookup -- --ignored`

use std::cell::Cell;
use std::env;
use std::rc::Rc;

use formdom::{Document, Element, Event};
use subform_lookup::{AddressAutofill, LookupClient, LookupError, NoLoader, PostalAddress, DEFAULT_POSTAL_BASE_URL};

mod common;

fn page() -> Document {
    Document::new(
        Element::div()
            .id("page")
            .child(Element::div().id("loadingAlert").hidden(true))
            .child(Element::input("zipCode").id("zipCode"))
            .child(
                Element::select("state")
                    .id("state")
                    .child(Element::option("", "State"))
                    .child(Element::option("rj-hash", "Rio de Janeiro").data("acronym", "RJ"))
                    .child(Element::option("sp-hash", "São Paulo").data("acronym", "SP")),
            )
            .child(
                Element::select("city")
                    .id("city")
                    .child(Element::option("", "City"))
                    .child(Element::option("c1", "Campinas"))
                    .child(Element::option("c2", "São Paulo")),
            )
            .child(Element::input("neighborhood").id("neighborhood"))
            .child(Element::input("place").id("place"))
            .child(Element::input("complement").id("complement")),
    )
}

fn se() -> PostalAddress {
    PostalAddress {
        zip_code: "01001-000".into(),
        street: "Praça da Sé".into(),
        complement: "lado ímpar".into(),
        neighborhood: "Sé".into(),
        city: "São Paulo".into(),
        state: "SP".into(),
    }
}

#[test]
fn test_select_state_by_acronym() {
    let mut doc = page();
    let autofill = AddressAutofill::new();

    assert_eq!(autofill.select_state(&mut doc, &se()), Some("sp-hash".to_string()));
    assert_eq!(doc.value("state"), Some("sp-hash"));

    let unknown = PostalAddress {
        state: "XX".into(),
        ..se()
    };
    assert_eq!(autofill.select_state(&mut doc, &unknown), None);
}

#[test]
fn test_fill_selects_city_by_label() {
    let mut doc = page();
    let autofill = AddressAutofill::new();

    assert!(autofill.fill(&mut doc, &se()).unwrap());

    assert_eq!(doc.value("city"), Some("c2"));
    assert_eq!(doc.value("neighborhood"), Some("Sé"));
    assert_eq!(doc.value("place"), Some("Praça da Sé"));
    assert_eq!(doc.value("complement"), Some("lado ímpar"));
}

#[test]
fn test_fill_without_matching_city() {
    let mut doc = page();
    let autofill = AddressAutofill::new();
    let address = PostalAddress {
        city: "Niterói".into(),
        ..se()
    };

    assert!(!autofill.fill(&mut doc, &address).unwrap());
    assert_eq!(doc.value("city"), Some(""));
    assert_eq!(doc.value("place"), Some("Praça da Sé"));
}

#[test]
fn test_matches_zip_focus_out() {
    let autofill = AddressAutofill::new().with_zip("#cep");
    assert!(autofill.matches(&Event::focus_out("cep")));
    assert!(!autofill.matches(&Event::focus_out("zipCode")));
    assert!(!autofill.matches(&Event::change("cep")));
}

#[tokio::test]
async fn test_empty_zip_does_nothing() {
    let mut doc = page();
    let client = LookupClient::builder()
        .base_url("http://127.0.0.1:9/app")
        .postal_base_url("http://127.0.0.1:9/ws")
        .build()
        .unwrap();
    let mut autofill = AddressAutofill::new();

    let out = autofill
        .handle(&client, &mut doc, &Event::focus_out("zipCode"))
        .await
        .unwrap();
    assert_eq!(out, None);
}

#[tokio::test]
async fn test_unreachable_service_hides_loader() {
    let mut doc = page();
    doc.set_value("zipCode", "01001-000").unwrap();
    doc.set_hidden("loadingAlert", false).unwrap();
    let client = LookupClient::builder()
        .base_url("http://127.0.0.1:9/app")
        .postal_base_url("http://127.0.0.1:9/ws")
        .build()
        .unwrap();
    let failed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&failed);
    let mut autofill = AddressAutofill::new().on_error(move |_| flag.set(true));

    let err = autofill.lookup(&client, &mut doc).await.unwrap_err();

    assert!(err.is_network());
    assert!(failed.get());
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
    assert_eq!(doc.value("place"), Some(""));
}

const SE_RESPONSE: &str = r#"{
    "cep": "01001-000",
    "logradouro": "Praça da Sé",
    "complemento": "lado ímpar",
    "bairro": "Sé",
    "localidade": "São Paulo",
    "uf": "SP",
    "ibge": "3550308"
}"#;

const SP_CITIES: &str =
    r#"[{"name":"Campinas","hashString":"city-cps"},{"name":"São Paulo","hashString":"city-sp"}]"#;

#[tokio::test]
async fn test_lookup_fills_whole_address() {
    let base = common::serve(&[
        ("/ws/01001000/json/", SE_RESPONSE),
        ("/app/states/sp-hash/cities", SP_CITIES),
    ])
    .await;
    let client = LookupClient::builder()
        .base_url(format!("{base}/app"))
        .postal_base_url(format!("{base}/ws/"))
        .build()
        .unwrap();
    let mut doc = page();
    doc.set_value("zipCode", "01001-000").unwrap();
    let filled = Rc::new(Cell::new(false));
    let flag = Rc::clone(&filled);
    let mut autofill = AddressAutofill::new().on_success(move |_, address| flag.set(address.state == "SP"));

    let address = autofill
        .handle(&client, &mut doc, &Event::focus_out("zipCode"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(address, se());
    assert!(filled.get());
    assert_eq!(doc.value("state"), Some("sp-hash"));
    let cities: Vec<_> = doc.options("city").unwrap();
    assert_eq!(
        cities,
        vec![("", "City"), ("city-cps", "Campinas"), ("city-sp", "São Paulo")]
    );
    assert_eq!(doc.value("city"), Some("city-sp"));
    assert_eq!(doc.value("neighborhood"), Some("Sé"));
    assert_eq!(doc.value("place"), Some("Praça da Sé"));
    assert_eq!(doc.value("complement"), Some("lado ímpar"));
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
}

#[tokio::test]
async fn test_unknown_postal_code() {
    let base = common::serve(&[("/ws/99999999/json/", r#"{"erro": true}"#)]).await;
    let client = LookupClient::builder()
        .base_url(format!("{base}/app"))
        .postal_base_url(format!("{base}/ws"))
        .build()
        .unwrap();
    let mut doc = page();
    doc.set_value("zipCode", "99999-999").unwrap();
    let mut autofill = AddressAutofill::new();

    let err = autofill.lookup(&client, &mut doc).await.unwrap_err();

    assert!(matches!(err, LookupError::PostalCodeNotFound(ref cep) if cep == "99999999"));
    assert_eq!(doc.value("state"), Some(""));
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
}

#[tokio::test]
#[ignore = "requires network access to the postal-code service"]
async fn test_live_postal_lookup() {
    let _ = dotenvy::dotenv();
    let base = env::var("LOOKUP_POSTAL_BASE_URL").unwrap_or_else(|_| DEFAULT_POSTAL_BASE_URL.to_string());
    let zip = env::var("LOOKUP_ZIP_CODE").unwrap_or_else(|_| "01001-000".to_string());

    let client = LookupClient::builder()
        .base_url("http://127.0.0.1:9/app")
        .postal_base_url(base)
        .build()
        .expect("Failed to build client");

    let address = client
        .postal_address(&subform_lookup::normalize_zip(&zip))
        .await
        .expect("Lookup failed");

    assert_eq!(address.state.len(), 2, "State should be a two-letter acronym");
    assert!(!address.city.is_empty());
    println!("{zip}: {} - {}/{}", address.street, address.city, address.state);

    // Autofill without the application's city endpoint still selects the state.
    let mut doc = page();
    let autofill = AddressAutofill::new().with_loader(Rc::new(NoLoader));
    autofill.select_state(&mut doc, &address);
}
