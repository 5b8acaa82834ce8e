//! List-view table configuration.
//!
//! Produces the column and table settings a server-side paged data table
//! expects (DataTables JSON shape). Action columns resolve to data-driven
//! [`ListAction`]s instead of markup.

use serde::Serialize;
use serde_json::Value;

/// Portuguese table translations, relative to the application context path.
pub const LANGUAGE_PATH: &str = "js/plugins/datatables/pt-br.json";

/// Trims one trailing `/` from a URL.
pub fn remove_final_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// How a column is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnRender {
    /// Show the data value.
    #[default]
    Data,
    /// Offer a delete action for the row's hash.
    DeleteAction,
    /// Offer an update action navigating to `url_pattern` with `{id}` replaced.
    UpdateAction { url_pattern: String },
}

/// What a row action does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Store the hash and ask for confirmation before deleting.
    ConfirmDelete { hash: String },
    /// Open the update page.
    Navigate { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub data: String,
    #[serde(rename = "bSearchable")]
    pub searchable: bool,
    #[serde(rename = "bSortable")]
    pub sortable: bool,
    #[serde(skip)]
    pub render: ColumnRender,
}

impl ColumnDefinition {
    /// A sortable, searchable data column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: name.into(),
            searchable: true,
            sortable: true,
            render: ColumnRender::Data,
        }
    }

    pub fn sortable_searchable(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    pub fn non_sortable_searchable(name: impl Into<String>) -> Self {
        Self::new(name).sortable(false)
    }

    pub fn non_sortable_non_searchable(name: impl Into<String>) -> Self {
        Self::new(name).sortable(false).searchable(false)
    }

    /// Delete action over the row's `name` value (usually `hash`).
    pub fn delete_action(name: impl Into<String>) -> Self {
        Self {
            render: ColumnRender::DeleteAction,
            ..Self::non_sortable_non_searchable(name)
        }
    }

    /// Update action navigating to `{base_url}/{id}`, keyed by `hash`.
    pub fn update_action(base_url: &str) -> Self {
        Self::update_action_with_pattern(format!("{}/{{id}}", remove_final_slash(base_url)), "hash")
    }

    pub fn update_action_with_pattern(url_pattern: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            render: ColumnRender::UpdateAction {
                url_pattern: url_pattern.into(),
            },
            ..Self::non_sortable_non_searchable(name)
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// The column's data value for a row, as display text.
    pub fn display(&self, row: &Value) -> Option<String> {
        match row.get(&self.data)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The action an action column offers for `row`.
    pub fn action_for(&self, row: &Value) -> Option<ListAction> {
        let key = self.display(row)?;
        match &self.render {
            ColumnRender::Data => None,
            ColumnRender::DeleteAction => Some(ListAction::ConfirmDelete { hash: key }),
            ColumnRender::UpdateAction { url_pattern } => Some(ListAction::Navigate {
                url: url_pattern.replace("{id}", &key),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AjaxSource {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportButton {
    pub extend: String,
    #[serde(rename = "className")]
    pub class_name: String,
}

impl ExportButton {
    pub fn new(extend: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            extend: extend.into(),
            class_name: class_name.into(),
        }
    }

    /// Copy, Excel, PDF and print buttons.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("copy", "btn btn-primary fa fa-copy"),
            Self::new("excel", "btn btn-primary fa fa-table"),
            Self::new("pdf", "btn btn-primary fa fa-file"),
            Self::new("print", "btn btn-primary glyphicon glyphicon-print"),
        ]
    }
}

/// Settings of a server-side paged list table.
///
/// # Example
///
/// ```
/// use subform::listview::{ColumnDefinition, ListViewConfig, SortDirection};
///
/// let config = ListViewConfig::new(
///     "/app/services/",
///     vec![
///         ColumnDefinition::new("name"),
///         ColumnDefinition::update_action("/app/services"),
///         ColumnDefinition::delete_action("hash"),
///     ],
/// )
/// .with_order(0, SortDirection::Desc);
///
/// assert_eq!(config.ajax.url, "/app/services/table");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListViewConfig {
    /// Element id of the table. Not part of the widget settings.
    #[serde(skip)]
    pub table_id: String,
    pub responsive: bool,
    pub order: Vec<(usize, SortDirection)>,
    pub paging: bool,
    #[serde(rename = "sPaginationType")]
    pub pagination_type: String,
    pub searching: bool,
    pub ordering: bool,
    pub processing: bool,
    #[serde(rename = "serverSide")]
    pub server_side: bool,
    pub ajax: AjaxSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    pub columns: Vec<ColumnDefinition>,
    #[serde(rename = "iDisplayLength")]
    pub page_length: i32,
    #[serde(rename = "aLengthMenu")]
    pub length_menu: (Vec<i32>, Vec<String>),
    pub dom: String,
    pub buttons: Vec<ExportButton>,
}

impl ListViewConfig {
    /// Defaults: ordered by column 1 ascending, ten rows per page, data from
    /// `{base_url}/table`.
    pub fn new(base_url: &str, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            table_id: "listTable".to_string(),
            responsive: true,
            order: vec![(1, SortDirection::Asc)],
            paging: true,
            pagination_type: "full_numbers".to_string(),
            searching: true,
            ordering: true,
            processing: true,
            server_side: true,
            ajax: AjaxSource {
                url: format!("{}/table", remove_final_slash(base_url)),
            },
            language: None,
            columns,
            page_length: 10,
            length_menu: (
                vec![5, 10, 25, 50, -1],
                ["5", "10", "25", "50", "Todos"].map(String::from).to_vec(),
            ),
            dom: "Blfrtip".to_string(),
            buttons: ExportButton::defaults(),
        }
    }

    pub fn with_table_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.table_id = formdom::normalize_id(&id).to_string();
        self
    }

    pub fn with_table_url(mut self, url: impl Into<String>) -> Self {
        self.ajax.url = url.into();
        self
    }

    pub fn with_order(mut self, index: usize, direction: SortDirection) -> Self {
        self.order = vec![(index, direction)];
        self
    }

    /// Points the translations at [`LANGUAGE_PATH`] under `context_path`.
    pub fn with_context_path(self, context_path: &str) -> Self {
        let url = format!("{}/{}", remove_final_slash(context_path), LANGUAGE_PATH);
        self.with_language_url(url)
    }

    pub fn with_language_url(mut self, url: impl Into<String>) -> Self {
        self.language = Some(Language { url: url.into() });
        self
    }

    pub fn with_page_length(mut self, length: i32) -> Self {
        self.page_length = length;
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<ExportButton>) -> Self {
        self.buttons = buttons;
        self
    }

    /// The widget settings as JSON.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
