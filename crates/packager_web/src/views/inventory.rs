use crate::view_state::ViewState;
use crate::views::{
    attribute_state, format_weight, AttributeRow, HiddenField, NewEntityForm, SelectOption,
};
use askama::Template;
use packager_core::{Category, CategoryWithItems, InventoryItem};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: Uuid,
    pub name: String,
    pub item_count: usize,
    pub weight: String,
    pub active: bool,
}

/// An item row of the active category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub weight: String,
    pub grams: String,
    pub category_id: Uuid,
    pub state: ViewState,
}

impl ItemRow {
    pub fn new(item: &InventoryItem, state: ViewState) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            weight: format_weight(u64::from(item.weight)),
            grams: item.weight.to_string(),
            category_id: item.category_id,
            state,
        }
    }

    /// Edit row echoing input that failed to apply to item `id`.
    pub fn rejected(
        id: Uuid,
        name: &str,
        description: &str,
        grams: &str,
        category_id: Uuid,
        message: String,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            weight: String::new(),
            grams: grams.to_string(),
            category_id,
            state: ViewState::error(message),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn has_error(&self) -> bool {
        self.state.message().is_some()
    }

    pub fn error_text(&self) -> &str {
        self.state.message().unwrap_or_default()
    }
}

/// New-item form; the category is chosen from `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemForm {
    pub name: String,
    pub description: String,
    pub weight: String,
    pub options: Vec<SelectOption>,
    pub error: Option<String>,
}

impl NewItemForm {
    pub fn new(categories: &[Category], selected: Option<Uuid>) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            weight: String::new(),
            options: category_options(categories, selected),
            error: None,
        }
    }

    pub fn with_input(mut self, name: &str, description: &str, weight: &str) -> Self {
        self.name = name.to_string();
        self.description = description.to_string();
        self.weight = weight.to_string();
        self
    }

    pub fn with_error(mut self, message: Option<String>) -> Self {
        self.error = message;
        self
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }

    pub fn has_categories(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Item table of the active category plus the new-item form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsPanel {
    pub category_id: Option<Uuid>,
    pub heading: String,
    pub rows: Vec<ItemRow>,
    pub form: NewItemForm,
}

impl ItemsPanel {
    pub fn has_category(&self) -> bool {
        self.category_id.is_some()
    }
}

/// Everything the inventory page shows, built from one store snapshot.
pub struct InventorySnapshot {
    pub categories: Vec<CategoryWithItems>,
    pub total_weight: u64,
}

impl InventorySnapshot {
    pub fn plain_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .map(|entry| entry.category.clone())
            .collect()
    }

    pub fn entries(&self, active: Option<Uuid>) -> Vec<CategoryEntry> {
        self.categories
            .iter()
            .map(|entry| CategoryEntry {
                id: entry.category.id,
                name: entry.category.name.clone(),
                item_count: entry.items.len(),
                weight: format_weight(entry.total_weight()),
                active: active == Some(entry.category.id),
            })
            .collect()
    }

    /// Builds the items panel; `edit` selects one row for `state`.
    pub fn panel(
        &self,
        active: Option<Uuid>,
        edit: Option<Uuid>,
        state: &ViewState,
        form: NewItemForm,
    ) -> ItemsPanel {
        let category = active.and_then(|id| {
            self.categories
                .iter()
                .find(|entry| entry.category.id == id)
        });
        let rows = category
            .map(|entry| {
                entry
                    .items
                    .iter()
                    .map(|item| {
                        let row_state = if edit == Some(item.id) {
                            state.clone()
                        } else {
                            ViewState::Normal
                        };
                        ItemRow::new(item, row_state)
                    })
                    .collect()
            })
            .unwrap_or_default();
        ItemsPanel {
            category_id: category.map(|entry| entry.category.id),
            heading: category
                .map(|entry| entry.category.name.clone())
                .unwrap_or_default(),
            rows,
            form,
        }
    }
}

pub fn category_options(categories: &[Category], selected: Option<Uuid>) -> Vec<SelectOption> {
    categories
        .iter()
        .map(|category| SelectOption {
            value: category.id.to_string(),
            label: category.name.clone(),
            selected: selected == Some(category.id),
        })
        .collect()
}

/// Attribute rows of the item detail page.
///
/// Every edit form carries the other attributes as hidden fields because the
/// submit endpoint replaces the whole item.
pub fn item_attributes(
    item: &InventoryItem,
    categories: &[Category],
    edit: Option<&str>,
    state: &ViewState,
) -> Vec<AttributeRow> {
    let category_name = categories
        .iter()
        .find(|category| category.id == item.category_id)
        .map(|category| category.name.clone())
        .unwrap_or_default();
    let description = item.description.clone().unwrap_or_default();
    let fields = [
        ("name", item.name.clone()),
        ("description", description.clone()),
        ("weight", item.weight.to_string()),
        ("category_id", item.category_id.to_string()),
    ];
    let hidden_except = |field: &str| {
        fields
            .iter()
            .filter(|(name, _)| *name != field)
            .map(|(name, value)| HiddenField {
                name: *name,
                value: value.clone(),
            })
            .chain(std::iter::once(HiddenField {
                name: "attribute",
                value: attribute_key(field).to_string(),
            }))
            .collect::<Vec<_>>()
    };
    let base = format!("/inventory/item/{}/", item.id);
    let row = |key: &'static str,
               label: &'static str,
               field: &'static str,
               input_type: &'static str,
               display: String,
               input_value: String,
               options: Vec<SelectOption>| AttributeRow {
        key,
        label,
        display,
        field,
        input_type,
        input_value,
        options,
        hidden: hidden_except(field),
        action: format!("/inventory/item/{}/edit", item.id),
        edit_href: format!("{base}?edit={key}"),
        cancel_href: base.clone(),
        state: attribute_state(key, edit, state),
    };

    vec![
        row(
            "name",
            "Name",
            "name",
            "text",
            item.name.clone(),
            item.name.clone(),
            Vec::new(),
        ),
        row(
            "description",
            "Description",
            "description",
            "text",
            description.clone(),
            description,
            Vec::new(),
        ),
        row(
            "weight",
            "Weight",
            "weight",
            "number",
            format_weight(u64::from(item.weight)),
            item.weight.to_string(),
            Vec::new(),
        ),
        row(
            "category",
            "Category",
            "category_id",
            "select",
            category_name,
            item.category_id.to_string(),
            category_options(categories, Some(item.category_id)),
        ),
    ]
}

fn attribute_key(field: &str) -> &str {
    match field {
        "category_id" => "category",
        other => other,
    }
}

#[derive(Template)]
#[template(path = "inventory.html")]
pub struct InventoryPage {
    pub categories: Vec<CategoryEntry>,
    pub total_weight: String,
    pub category_form: NewEntityForm,
    pub panel: ItemsPanel,
}

#[derive(Template)]
#[template(path = "inventory_categories.html")]
pub struct InventoryCategories {
    pub categories: Vec<CategoryEntry>,
    pub total_weight: String,
    pub category_form: NewEntityForm,
}

#[derive(Template)]
#[template(path = "inventory_items.html")]
pub struct InventoryItems {
    pub panel: ItemsPanel,
}

#[derive(Template)]
#[template(path = "inventory_item_row.html")]
pub struct InventoryItemRow {
    pub row: ItemRow,
}

#[derive(Template)]
#[template(path = "inventory_item.html")]
pub struct InventoryItemPage {
    pub item_id: Uuid,
    pub name: String,
    pub category_href: String,
    pub category_name: String,
    pub attributes: Vec<AttributeRow>,
}
