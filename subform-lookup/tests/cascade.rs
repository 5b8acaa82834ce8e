use std::cell::{Cell, RefCell};
use std::rc::Rc;

use formdom::{Document, Element, Event, EventKind};
use subform_lookup::{Cascade, CascadeKind, ElementLoader, LookupClient, LookupError, OptionItem};

mod common;

fn page() -> Document {
    Document::new(
        Element::div()
            .id("page")
            .child(Element::div().id("loadingAlert").hidden(true))
            .child(
                Element::select("state")
                    .id("state")
                    .child(Element::option("", "Select a state"))
                    .child(Element::option("sp", "São Paulo").data("acronym", "SP")),
            )
            .child(
                Element::select("city")
                    .id("city")
                    .child(Element::option("", "Select a city"))
                    .child(Element::option("old", "Stale")),
            ),
    )
}

fn option_labels(doc: &Document, id: &str) -> Vec<String> {
    doc.options(id)
        .unwrap()
        .into_iter()
        .map(|(_, label)| label.to_string())
        .collect()
}

fn unreachable_client() -> LookupClient {
    // Nothing listens on the discard port.
    LookupClient::builder()
        .base_url("http://127.0.0.1:9/app")
        .postal_base_url("http://127.0.0.1:9/ws")
        .build()
        .unwrap()
}

#[test]
fn test_complete_keeps_placeholder_and_replaces_rest() {
    let mut doc = page();
    let mut cascade = Cascade::new(CascadeKind::CitiesByState);

    let items = vec![OptionItem::new("Campinas", "c1"), OptionItem::new("Santos", "c2")];
    cascade.complete(&mut doc, Ok(items)).unwrap();

    assert_eq!(option_labels(&doc, "city"), vec!["Select a city", "Campinas", "Santos"]);
    let values: Vec<_> = doc.options("city").unwrap().into_iter().map(|(v, _)| v).collect();
    assert_eq!(values, vec!["", "c1", "c2"]);
}

#[test]
fn test_follow_up_change_depends_on_kind() {
    let mut doc = page();

    let mut cities = Cascade::new(CascadeKind::CitiesByState);
    let event = cities.complete(&mut doc, Ok(Vec::new())).unwrap();
    assert_eq!(event, Some(Event::new("city", EventKind::Change)));

    let mut services = Cascade::new(CascadeKind::ServicesByCategory)
        .with_parent("#state")
        .with_child("#city");
    assert_eq!(services.complete(&mut doc, Ok(Vec::new())).unwrap(), None);
}

#[test]
fn test_success_hides_loader_and_calls_back() {
    let mut doc = page();
    doc.set_hidden("loadingAlert", false).unwrap();
    let called = Rc::new(Cell::new(false));
    let flag = Rc::clone(&called);
    let mut cascade = Cascade::new(CascadeKind::CitiesByState).on_success(move |_| flag.set(true));

    cascade.complete(&mut doc, Ok(vec![OptionItem::new("Campinas", "c1")])).unwrap();

    assert!(called.get());
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
}

#[test]
fn test_failure_leaves_child_untouched() {
    let mut doc = page();
    doc.set_hidden("loadingAlert", false).unwrap();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let mut cascade = Cascade::new(CascadeKind::CitiesByState)
        .on_success(|_| panic!("success callback on failure"))
        .on_error(move |e| *sink.borrow_mut() = e.status_code());

    let err = cascade
        .complete(&mut doc, Err(LookupError::http(500, "boom")))
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(*seen.borrow(), Some(500));
    assert_eq!(option_labels(&doc, "city"), vec!["Select a city", "Stale"]);
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
}

#[test]
fn test_missing_child_is_dom_error() {
    let mut doc = page();
    let mut cascade = Cascade::new(CascadeKind::ServicesByCategory);
    let err = cascade.complete(&mut doc, Ok(Vec::new())).unwrap_err();
    assert!(matches!(err, LookupError::Dom(_)));
}

#[test]
fn test_matches_only_parent_change() {
    let cascade = Cascade::new(CascadeKind::CitiesByState);
    assert!(cascade.matches(&Event::change("#state")));
    assert!(!cascade.matches(&Event::click("state")));
    assert!(!cascade.matches(&Event::change("city")));
}

#[tokio::test]
async fn test_unrelated_event_makes_no_request() {
    let mut doc = page();
    let client = unreachable_client();
    let mut cascade = Cascade::new(CascadeKind::CitiesByState);

    let out = cascade
        .handle(&client, &mut doc, &Event::change("city"))
        .await
        .unwrap();
    assert_eq!(out, None);
    assert_eq!(option_labels(&doc, "city").len(), 2);
}

#[tokio::test]
async fn test_empty_parent_clears_without_request() {
    let mut doc = page();
    let client = unreachable_client();
    let mut cascade = Cascade::new(CascadeKind::CitiesByState);

    cascade
        .handle(&client, &mut doc, &Event::change("state"))
        .await
        .unwrap();
    assert_eq!(option_labels(&doc, "city"), vec!["Select a city"]);
}

#[tokio::test]
async fn test_unreachable_server_reports_network_error() {
    let mut doc = page();
    doc.set_value("state", "sp").unwrap();
    let client = unreachable_client();
    let failed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&failed);
    let mut cascade = Cascade::new(CascadeKind::CitiesByState)
        .with_loader(Rc::new(ElementLoader::new("#loadingAlert")))
        .on_error(move |_| flag.set(true));

    let err = cascade
        .handle(&client, &mut doc, &Event::change("state"))
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(failed.get());
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
    assert_eq!(option_labels(&doc, "city"), vec!["Select a city", "Stale"]);
}

fn client_for(base: &str) -> LookupClient {
    LookupClient::builder()
        .base_url(format!("{base}/app/"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_server_options_replace_child_options() {
    let base = common::serve(&[(
        "/app/states/sp/cities",
        r#"[{"name":"Campinas","hashString":"c1"},{"name":"Santos","hashString":"c2"}]"#,
    )])
    .await;
    let client = client_for(&base);
    let mut doc = page();
    doc.set_value("state", "sp").unwrap();
    let mut cascade = Cascade::new(CascadeKind::CitiesByState);

    let follow_up = cascade
        .handle(&client, &mut doc, &Event::change("state"))
        .await
        .unwrap();

    assert_eq!(follow_up, Some(Event::change("city")));
    assert_eq!(option_labels(&doc, "city"), vec!["Select a city", "Campinas", "Santos"]);
    let values: Vec<_> = doc.options("city").unwrap().into_iter().map(|(v, _)| v).collect();
    assert_eq!(values, vec!["", "c1", "c2"]);
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
}

#[tokio::test]
async fn test_server_error_status_keeps_child() {
    let base = common::serve(&[]).await;
    let client = client_for(&base);
    let mut doc = page();
    doc.set_value("state", "sp").unwrap();
    let mut cascade = Cascade::new(CascadeKind::ServicesByCategory)
        .with_parent("state")
        .with_child("city");

    let err = cascade.load(&client, &mut doc).await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(option_labels(&doc, "city"), vec!["Select a city", "Stale"]);
    assert_eq!(doc.is_hidden("loadingAlert"), Some(true));
}

#[tokio::test]
async fn test_malformed_options_are_parse_errors() {
    let base = common::serve(&[("/app/states/sp/cities", r#"{"name":"not a list"}"#)]).await;
    let client = client_for(&base);

    let err = client.options(CascadeKind::CitiesByState, "sp").await.unwrap_err();

    assert!(matches!(err, LookupError::Parse { body: Some(ref body), .. } if body.contains("not a list")));
}
