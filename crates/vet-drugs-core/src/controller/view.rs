//! View models handed to the template layer.

use serde::Serialize;

use crate::models::{Drug, DrugForm, ValidationErrors};

/// Template for creating and editing a drug.
pub const VIEWS_DRUG_CREATE_OR_UPDATE_FORM: &str = "drugs/createOrUpdateDrugForm";
/// Template for the paginated drug list.
pub const VIEWS_DRUG_LIST: &str = "drugs/drugList";

/// One-shot messages carried across a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flash {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Flash {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(text.into()),
        }
    }
}

/// Model for [`VIEWS_DRUG_CREATE_OR_UPDATE_FORM`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugFormView {
    pub drug: Drug,
    /// Price exactly as typed, so a rejected value is shown back unchanged
    pub price_input: String,
    pub errors: ValidationErrors,
    /// Generic failure banner for a rejected submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DrugFormView {
    /// A form showing `drug` as stored.
    pub fn for_drug(drug: Drug) -> Self {
        let price_input = drug.price.map(|p| p.to_string()).unwrap_or_default();
        Self {
            drug,
            price_input,
            errors: ValidationErrors::new(),
            error: None,
        }
    }

    /// A form re-rendered after a rejected submission.
    pub fn rejected(drug: Drug, form: &DrugForm, errors: ValidationErrors, error: &str) -> Self {
        Self {
            drug,
            price_input: form.price_text().to_string(),
            errors,
            error: Some(error.to_string()),
        }
    }

    pub fn is_new(&self) -> bool {
        self.drug.is_new()
    }
}

/// Model for [`VIEWS_DRUG_LIST`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugListView {
    /// 1-based
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub list_drugs: Vec<Drug>,
    /// Name prefix the listing was filtered by, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A rendered page: template name plus its model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "model")]
pub enum View {
    #[serde(rename = "drugs/createOrUpdateDrugForm")]
    Form(DrugFormView),
    #[serde(rename = "drugs/drugList")]
    List(DrugListView),
}

impl View {
    /// Template name.
    pub fn name(&self) -> &'static str {
        match self {
            View::Form(_) => VIEWS_DRUG_CREATE_OR_UPDATE_FORM,
            View::List(_) => VIEWS_DRUG_LIST,
        }
    }
}
