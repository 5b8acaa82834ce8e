//! Postal-code (CEP) address autofill.

use std::fmt;
use std::rc::Rc;

use formdom::{Document, DomError, Event, EventKind};
use log::{debug, error, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::cascade::{Cascade, CascadeKind};
use crate::client::LookupClient;
use crate::error::LookupError;
use crate::loading::{ElementLoader, LoadingIndicator};

type SuccessCallback = Box<dyn FnMut(&mut Document, &PostalAddress)>;
type ErrorCallback = Box<dyn FnMut(&LookupError)>;

/// Address returned by the postal-code service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostalAddress {
    #[serde(rename = "cep")]
    pub zip_code: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "complemento")]
    pub complement: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "localidade")]
    pub city: String,
    /// Two-letter state acronym.
    #[serde(rename = "uf")]
    pub state: String,
}

impl PostalAddress {
    /// Reads a service response. A response flagged `erro` means the code is
    /// unknown.
    pub fn from_value(value: Value, cep: &str) -> Result<Self, LookupError> {
        let not_found = match value.get("erro") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag == "true",
            _ => false,
        };
        if not_found {
            return Err(LookupError::PostalCodeNotFound(cep.to_string()));
        }
        serde_json::from_value(value).map_err(|e| LookupError::parse(e.to_string()))
    }
}

/// Strips separators and surrounding blanks from a typed postal code.
pub fn normalize_zip(raw: &str) -> String {
    raw.trim().replace('-', "")
}

/// Fills address fields from the postal code typed into the zip field.
pub struct AddressAutofill {
    zip: String,
    state: String,
    city: String,
    neighborhood: String,
    place: String,
    complement: String,
    loader: Rc<dyn LoadingIndicator>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl AddressAutofill {
    pub fn new() -> Self {
        Self {
            zip: "zipCode".to_string(),
            state: "state".to_string(),
            city: "city".to_string(),
            neighborhood: "neighborhood".to_string(),
            place: "place".to_string(),
            complement: "complement".to_string(),
            loader: Rc::new(ElementLoader::default()),
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_zip(mut self, id: impl Into<String>) -> Self {
        self.zip = normalize(id);
        self
    }

    pub fn with_state(mut self, id: impl Into<String>) -> Self {
        self.state = normalize(id);
        self
    }

    pub fn with_city(mut self, id: impl Into<String>) -> Self {
        self.city = normalize(id);
        self
    }

    pub fn with_neighborhood(mut self, id: impl Into<String>) -> Self {
        self.neighborhood = normalize(id);
        self
    }

    pub fn with_place(mut self, id: impl Into<String>) -> Self {
        self.place = normalize(id);
        self
    }

    pub fn with_complement(mut self, id: impl Into<String>) -> Self {
        self.complement = normalize(id);
        self
    }

    pub fn with_loader(mut self, loader: Rc<dyn LoadingIndicator>) -> Self {
        self.loader = loader;
        self
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Document, &PostalAddress) + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(&LookupError) + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Whether `event` is the zip field losing focus.
    pub fn matches(&self, event: &Event) -> bool {
        event.kind == EventKind::FocusOut && event.target == self.zip
    }

    pub async fn handle(
        &mut self,
        client: &LookupClient,
        doc: &mut Document,
        event: &Event,
    ) -> Result<Option<PostalAddress>, LookupError> {
        if !self.matches(event) {
            return Ok(None);
        }
        self.lookup(client, doc).await
    }

    /// Looks up the typed postal code and fills the address fields.
    ///
    /// An empty zip field does nothing.
    pub async fn lookup(
        &mut self,
        client: &LookupClient,
        doc: &mut Document,
    ) -> Result<Option<PostalAddress>, LookupError> {
        let cep = match doc.value(&self.zip) {
            Some(raw) => normalize_zip(raw),
            None => {
                let err = LookupError::Dom(DomError::MissingElement(self.zip.clone()));
                return Err(self.fail(doc, err));
            }
        };
        if cep.is_empty() {
            return Ok(None);
        }

        self.loader.show(doc);
        let address = match client.postal_address(&cep).await {
            Ok(address) => address,
            Err(err) => return Err(self.fail(doc, err)),
        };

        match self.select_state(doc, &address) {
            Some(_) => {
                let mut cities = Cascade::new(CascadeKind::CitiesByState)
                    .with_parent(self.state.as_str())
                    .with_child(self.city.as_str())
                    .with_loader(Rc::clone(&self.loader));
                if let Err(err) = cities.load(client, doc).await {
                    return Err(self.fail(doc, err));
                }
            }
            None => warn!("postal: no state option with acronym '{}'", address.state),
        }

        if let Err(err) = self.fill(doc, &address) {
            return Err(self.fail(doc, err.into()));
        }

        self.loader.hide(doc);
        debug!("postal: filled address for {}", cep);
        if let Some(callback) = self.on_success.as_mut() {
            callback(doc, &address);
        }
        Ok(Some(address))
    }

    /// Selects the state option whose `acronym` data attribute matches.
    pub fn select_state(&self, doc: &mut Document, address: &PostalAddress) -> Option<String> {
        doc.select_option_where(&self.state, |option| {
            option.data_attr("acronym") == Some(address.state.as_str())
        })
    }

    /// Selects the city by label and writes the street-level fields.
    ///
    /// Returns whether a city option matched.
    pub fn fill(&self, doc: &mut Document, address: &PostalAddress) -> Result<bool, DomError> {
        let city = doc
            .select_option_where(&self.city, |option| option.text() == Some(address.city.as_str()))
            .is_some();
        if !city {
            warn!("postal: no city option labelled '{}'", address.city);
        }

        doc.set_value(&self.neighborhood, address.neighborhood.as_str())?;
        doc.set_value(&self.place, address.street.as_str())?;
        doc.set_value(&self.complement, address.complement.as_str())?;
        Ok(city)
    }

    fn fail(&mut self, doc: &mut Document, err: LookupError) -> LookupError {
        self.loader.hide(doc);
        error!("postal lookup failed: {}", err);
        if let Some(callback) = self.on_error.as_mut() {
            callback(&err);
        }
        err
    }
}

impl Default for AddressAutofill {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AddressAutofill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressAutofill")
            .field("zip", &self.zip)
            .field("state", &self.state)
            .field("city", &self.city)
            .finish_non_exhaustive()
    }
}

fn normalize(id: impl Into<String>) -> String {
    let id = id.into();
    formdom::normalize_id(&id).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_zip() {
        assert_eq!(normalize_zip(" 01001-000 "), "01001000");
        assert_eq!(normalize_zip(""), "");
    }

    #[test]
    fn test_from_value() {
        let value = json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        });
        let address = PostalAddress::from_value(value, "01001000").unwrap();
        assert_eq!(address.state, "SP");
        assert_eq!(address.street, "Praça da Sé");
    }

    #[test]
    fn test_erro_flag_is_not_found() {
        for value in [json!({"erro": true}), json!({"erro": "true"})] {
            let err = PostalAddress::from_value(value, "99999999").unwrap_err();
            assert!(matches!(err, LookupError::PostalCodeNotFound(ref cep) if cep == "99999999"));
        }
    }
}
