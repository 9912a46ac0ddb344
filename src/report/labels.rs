//! Display labels for report fields.
//!
//! Field ids like `Delivery.CustomerPhone` are translated to the labels used
//! in the console table and the spreadsheet header. Unknown fields keep
//! their id.

use std::collections::BTreeMap;

/// Built-in labels for the sales report: group-by fields first, then aggregates
const SALES_LABELS: &[(&str, &str)] = &[
    ("Delivery.CustomerPhone", "Телефон клиента"),
    ("Delivery.CustomerCreatedDateTyped", "Дата регистрации клиента"),
    ("Delivery.CustomerName", "Имя клиента"),
    ("Delivery.Email", "Email"),
    ("Delivery.CustomerComment", "Комментарий клиента"),
    ("OpenDate.Typed", "Дата заказа"),
    ("ExternalNumber", "Внешний номер заказа"),
    ("GuestNum", "Количество гостей"),
    ("DishSumInt", "Сумма заказа"),
    ("DishDiscountSumInt", "Сумма со скидкой"),
    ("UniqOrderId", "Уникальный ID заказа"),
];

/// Labelled columns whose text is word-wrapped for display
pub const DEFAULT_WRAP_COLUMNS: &[&str] = &["Комментарий клиента", "Имя клиента", "Email"];

/// Field id → display label
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnLabels {
    labels: BTreeMap<String, String>,
}

impl ColumnLabels {
    /// The fixed sales report translation table
    pub fn sales() -> Self {
        ColumnLabels {
            labels: SALES_LABELS.iter().map(|(field, label)| (field.to_string(), label.to_string())).collect(),
        }
    }

    /// Add or replace labels
    pub fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, overrides: I) {
        self.labels.extend(overrides);
    }

    /// Label for a field, or the field id itself when there is none
    pub fn label_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.get(field).map(String::as_str).unwrap_or(field)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.labels.len()
    }
}
