//! Request handling for drug management.
//!
//! [`DrugController`] holds the flow of every drug page independently of
//! any web framework: it binds forms, validates, talks to the repository and
//! answers with either a [`View`] to render or a redirect carrying a
//! [`Flash`].
//!
//! | Route                     | Handler                     |
//! |---------------------------|-----------------------------|
//! | `GET  /drugs/new`         | [`DrugController::init_creation_form`] |
//! | `POST /drugs/new`         | [`DrugController::process_creation_form`] |
//! | `GET  /drugs`             | [`DrugController::show_drug_list`] |
//! | `GET  /drugs/{id}/edit`   | [`DrugController::init_update_form`] |
//! | `POST /drugs/{id}/edit`   | [`DrugController::process_update_form`] |
//! | `GET  /drugs/{id}/delete` | [`DrugController::delete_drug`] |

mod view;

pub use view::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::{Drug, DrugForm, MissingFieldError};
use crate::page::PageRequest;
use crate::repository::DrugRepository;

/// Rows per list page.
pub const PAGE_SIZE: u64 = 5;
/// Where every successful submission lands.
pub const DRUGS_PATH: &str = "/drugs";

/// Controller errors.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("{0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] DbError),
}

impl From<MissingFieldError> for ControllerError {
    fn from(e: MissingFieldError) -> Self {
        ControllerError::BadRequest(e.to_string())
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// What a handler asks the web layer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Render a page with status 200.
    Render(View),
    /// Answer 302 to `location`, carrying `flash` to the next page.
    Redirect { location: &'static str, flash: Flash },
}

impl Outcome {
    fn redirect_to_list(message: &str) -> Self {
        Outcome::Redirect {
            location: DRUGS_PATH,
            flash: Flash::message(message),
        }
    }
}

/// Drug management handlers over a [`DrugRepository`].
pub struct DrugController<R> {
    drugs: R,
}

impl<R: DrugRepository> DrugController<R> {
    pub fn new(drugs: R) -> Self {
        Self { drugs }
    }

    /// The repository this controller works on.
    pub fn repository(&self) -> &R {
        &self.drugs
    }

    /// The drug a page works on: a fresh one without an id, otherwise the
    /// stored drug.
    pub fn find_drug(&self, drug_id: Option<i64>) -> ControllerResult<Drug> {
        let Some(drug_id) = drug_id else {
            return Ok(Drug::default());
        };
        self.drugs.find_by_id(drug_id)?.ok_or_else(|| {
            ControllerError::NotFound(format!(
                "Drug not found with id: {}. Please ensure the ID is correct \
                 and the drug exists in the database.",
                drug_id
            ))
        })
    }

    /// `GET /drugs/new`
    pub fn init_creation_form(&self) -> ControllerResult<Outcome> {
        let drug = self.find_drug(None)?;
        Ok(Outcome::Render(View::Form(DrugFormView::for_drug(drug))))
    }

    /// `POST /drugs/new`
    pub fn process_creation_form(&self, form: &DrugForm) -> ControllerResult<Outcome> {
        let mut drug = self.find_drug(None)?;
        let errors = bind_and_validate(form, &mut drug)?;
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "Rejected new drug submission");
            return Ok(Outcome::Render(View::Form(DrugFormView::rejected(
                drug,
                form,
                errors,
                "There was an error in creating the drug.",
            ))));
        }

        let saved = self.drugs.save(&drug)?;
        tracing::info!(drug_id = ?saved.id, name = %saved.name, "Drug created");
        Ok(Outcome::redirect_to_list("New Drug Created"))
    }

    /// `GET /drugs?page=N[&name=prefix]`
    ///
    /// `page` is 1-based. Pages past the end come back empty with the real
    /// totals.
    pub fn show_drug_list(&self, page: i64, name: Option<&str>) -> ControllerResult<Outcome> {
        if page < 1 {
            return Err(ControllerError::BadRequest(format!(
                "page must be at least 1, got {}",
                page
            )));
        }
        let request = PageRequest::of(page as u64 - 1, PAGE_SIZE)
            .ok_or_else(|| ControllerError::BadRequest("page size must be positive".into()))?;

        let name = name.filter(|n| !n.is_empty());
        let paginated = match name {
            Some(prefix) => self.drugs.find_by_name_starting_with(prefix, request)?,
            None => self.drugs.find_all(request)?,
        };

        Ok(Outcome::Render(View::List(DrugListView {
            current_page: page as u64,
            total_pages: paginated.total_pages(),
            total_items: paginated.total_elements(),
            list_drugs: paginated.into_content(),
            name: name.map(str::to_string),
        })))
    }

    /// `GET /drugs/{id}/edit`
    pub fn init_update_form(&self, drug_id: i64) -> ControllerResult<Outcome> {
        let drug = self.find_drug(Some(drug_id))?;
        Ok(Outcome::Render(View::Form(DrugFormView::for_drug(drug))))
    }

    /// `POST /drugs/{id}/edit`
    ///
    /// The id in the path is the one that gets saved, whatever the body says.
    pub fn process_update_form(&self, drug_id: i64, form: &DrugForm) -> ControllerResult<Outcome> {
        let mut drug = self.find_drug(Some(drug_id))?;
        let errors = bind_and_validate(form, &mut drug)?;
        if !errors.is_empty() {
            tracing::debug!(drug_id, errors = errors.len(), "Rejected drug update");
            return Ok(Outcome::Render(View::Form(DrugFormView::rejected(
                drug,
                form,
                errors,
                "There was an error in updating the drug.",
            ))));
        }

        drug.id = Some(drug_id);
        self.drugs.save(&drug)?;
        tracing::info!(drug_id, name = %drug.name, "Drug updated");
        Ok(Outcome::redirect_to_list("Drug Values Updated"))
    }

    /// `GET /drugs/{id}/delete`
    ///
    /// Deleting an id that is already gone still succeeds.
    pub fn delete_drug(&self, drug_id: i64) -> ControllerResult<Outcome> {
        if self.drugs.delete_by_id(drug_id)? {
            tracing::info!(drug_id, "Drug deleted");
        } else {
            tracing::warn!(drug_id, "Delete requested for a drug that does not exist");
        }
        Ok(Outcome::redirect_to_list("Drug Deleted"))
    }
}

/// Bind the form onto `drug`, then run the field rules.
fn bind_and_validate(
    form: &DrugForm,
    drug: &mut Drug,
) -> ControllerResult<crate::models::ValidationErrors> {
    let mut errors = form.bind_onto(drug)?;
    errors.absorb(drug.validate());
    Ok(errors)
}
