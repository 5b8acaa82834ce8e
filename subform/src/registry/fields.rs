use formdom::{Document, DomError};

use crate::record::FieldMap;

/// Snapshot of every named field under `scope`, in document order.
pub(crate) fn capture(doc: &Document, scope: &str) -> Result<FieldMap, DomError> {
    let mut fields = FieldMap::new();
    for element in doc.fields(scope)? {
        if let Some(name) = &element.name {
            fields.insert(name.clone(), element.value.clone());
        }
    }
    Ok(fields)
}

/// Write `values` back into the matching fields under `scope`.
pub(crate) fn populate(doc: &mut Document, scope: &str, values: &FieldMap) -> Result<(), DomError> {
    for (name, value) in values {
        match doc.field_by_name_mut(scope, name) {
            Some(element) => element.value = value.clone(),
            None => log::debug!("populate: '{}' has no field '{}'", scope, name),
        }
    }
    Ok(())
}

pub(crate) fn reset(doc: &mut Document, scope: &str) -> Result<(), DomError> {
    let ids: Vec<String> = doc.fields(scope)?.into_iter().map(|el| el.id.clone()).collect();
    for id in ids {
        doc.set_value(&id, "")?;
    }
    Ok(())
}
