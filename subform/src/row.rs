//! Table rows mirroring registry records.
//!
//! Rows are described as data first ([`RowDescriptor`]) and rendered into
//! elements second. Action buttons come back with their ids so the registry
//! can bind them; no handler code is embedded in the markup.

use std::fmt;

use formdom::Element;

use crate::record::{Origin, Record, RecordId};

type CellRenderer = Box<dyn Fn(&Record) -> String>;

/// One visible column: a header plus a render function over the record.
pub struct TableColumn {
    header: String,
    render: CellRenderer,
}

impl TableColumn {
    pub fn new<F>(header: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Record) -> String + 'static,
    {
        Self {
            header: header.into(),
            render: Box::new(render),
        }
    }

    /// A column showing one field verbatim (empty when absent).
    pub fn field(header: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(header, move |record| {
            record.field(&field).unwrap_or_default().to_string()
        })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn render(&self, record: &Record) -> String {
        (self.render)(record)
    }
}

impl fmt::Debug for TableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableColumn")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Per-row controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    fn slug(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }
}

/// Structured description of one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDescriptor {
    pub record_id: RecordId,
    pub origin: Origin,
    pub cells: Vec<String>,
    pub actions: Vec<RowAction>,
}

impl RowDescriptor {
    /// Describes `record` using `columns`, or its field values in order when
    /// no columns are configured. The edit action is offered only when
    /// `editable` is set.
    pub fn describe(record: &Record, columns: &[TableColumn], editable: bool) -> Self {
        let cells = if columns.is_empty() {
            record.fields().values().cloned().collect()
        } else {
            columns.iter().map(|c| c.render(record)).collect()
        };

        let mut actions = Vec::with_capacity(2);
        if editable {
            actions.push(RowAction::Edit);
        }
        actions.push(RowAction::Delete);

        Self {
            record_id: record.id().clone(),
            origin: record.origin().clone(),
            cells,
            actions,
        }
    }

    pub fn row_id(&self) -> String {
        format!("row-{}", self.record_id)
    }

    pub fn button_id(&self, action: RowAction) -> String {
        format!("{}-{}", action.slug(), self.record_id)
    }

    /// Builds the row element.
    pub fn render(&self) -> RenderedRow {
        let mut buttons = Element::div().class("actions");
        let mut actions = Vec::with_capacity(self.actions.len());
        for &action in &self.actions {
            let id = self.button_id(action);
            buttons = buttons.child(
                Element::button(action.label())
                    .id(id.clone())
                    .class(action.slug()),
            );
            actions.push((id, action));
        }

        let element = Element::row()
            .id(self.row_id())
            .data("record-id", self.record_id.as_str())
            .data("origin", self.origin.as_attr())
            .children(self.cells.iter().map(Element::cell).collect())
            .child(buttons);

        RenderedRow { element, actions }
    }
}

/// A rendered row plus the action buttons to bind.
#[derive(Debug, Clone)]
pub struct RenderedRow {
    pub element: Element,
    pub actions: Vec<(String, RowAction)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldMap;

    fn widget() -> Record {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), "Widget".into());
        fields.insert("qty".into(), "3".into());
        Record::new(RecordId::new("r1"), fields, Origin::ClientCreated)
    }

    #[test]
    fn test_cells_default_to_field_values() {
        let row = RowDescriptor::describe(&widget(), &[], false);
        assert_eq!(row.cells, vec!["Widget", "3"]);
        assert_eq!(row.actions, vec![RowAction::Delete]);
    }

    #[test]
    fn test_columns_render_cells() {
        let columns = vec![
            TableColumn::new("Item", |r| {
                format!("{} x{}", r.field("name").unwrap_or("?"), r.field("qty").unwrap_or("0"))
            }),
            TableColumn::field("Missing", "price"),
        ];
        let row = RowDescriptor::describe(&widget(), &columns, true);
        assert_eq!(row.cells, vec!["Widget x3", ""]);
        assert_eq!(row.actions, vec![RowAction::Edit, RowAction::Delete]);
    }

    #[test]
    fn test_render_returns_button_ids() {
        let rendered = RowDescriptor::describe(&widget(), &[], true).render();
        assert_eq!(rendered.element.id, "row-r1");
        assert_eq!(rendered.element.data_attr("origin"), Some("client"));
        assert_eq!(
            rendered.actions,
            vec![
                ("edit-r1".to_string(), RowAction::Edit),
                ("delete-r1".to_string(), RowAction::Delete)
            ]
        );
        // Two cells plus the action group.
        assert_eq!(rendered.element.child_elements().len(), 3);
    }
}
