//! Shared application state.

use std::sync::{Arc, Mutex};

use vet_drugs_core::{ControllerResult, Database, DrugController};

use crate::error::WebError;
use crate::flash::FlashStore;

/// State handed to every handler.
///
/// The controller sits behind one mutex: a request holds the connection for
/// its whole read-then-write sequence, which makes each request atomic with
/// respect to the others.
#[derive(Clone)]
pub struct AppState {
    controller: Arc<Mutex<DrugController<Database>>>,
    flash: FlashStore,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::with_flash_store(db, FlashStore::new())
    }

    pub fn with_flash_store(db: Database, flash: FlashStore) -> Self {
        Self {
            controller: Arc::new(Mutex::new(DrugController::new(db))),
            flash,
        }
    }

    pub fn flash(&self) -> &FlashStore {
        &self.flash
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with_controller<T, F>(&self, f: F) -> Result<T, WebError>
    where
        F: FnOnce(&DrugController<Database>) -> ControllerResult<T>,
    {
        let controller = self.controller.lock()?;
        Ok(f(&controller)?)
    }
}
