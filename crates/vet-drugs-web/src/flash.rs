//! One-shot flash messages carried across a redirect.
//!
//! A redirect stores its [`Flash`] under a random token and sets the
//! `drug_flash` cookie. The next rendered page takes the entry out of the
//! store and expires the cookie, so each flash is shown at most once.
//!
//! Entries nobody comes back for expire after [`FLASH_TTL`], and the store
//! never holds more than its capacity; the oldest entry goes first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use uuid::Uuid;
use vet_drugs_core::Flash;

use crate::error::WebError;

/// Cookie holding the flash token.
pub const FLASH_COOKIE: &str = "drug_flash";
/// How long an unclaimed flash is kept.
pub const FLASH_TTL: Duration = Duration::from_secs(300);
/// Most flashes kept at once.
pub const FLASH_CAPACITY: usize = 1024;

struct Entry {
    created: Instant,
    /// Insertion order, breaks ties between equal `created` instants
    seq: u64,
    flash: Flash,
}

#[derive(Default)]
struct Entries {
    by_token: HashMap<Uuid, Entry>,
    next_seq: u64,
}

/// Server-side flash storage shared by all handlers.
#[derive(Clone)]
pub struct FlashStore {
    entries: Arc<Mutex<Entries>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for FlashStore {
    fn default() -> Self {
        Self::with_limits(FLASH_TTL, FLASH_CAPACITY)
    }
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a custom expiry and size bound (capacity of at least one).
    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries::default())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Keep `flash` for the next request and return its token.
    pub fn put(&self, flash: Flash) -> Result<Uuid, WebError> {
        let now = Instant::now();
        let mut entries = self.entries.lock()?;

        entries
            .by_token
            .retain(|_, entry| now.duration_since(entry.created) < self.ttl);
        while entries.by_token.len() >= self.capacity {
            let oldest = entries
                .by_token
                .iter()
                .min_by_key(|(_, entry)| (entry.created, entry.seq))
                .map(|(token, _)| *token);
            match oldest {
                Some(token) => {
                    entries.by_token.remove(&token);
                }
                None => break,
            }
        }

        let token = Uuid::new_v4();
        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.by_token.insert(
            token,
            Entry {
                created: now,
                seq,
                flash,
            },
        );
        Ok(token)
    }

    /// Remove and return the flash referenced by the request cookie.
    ///
    /// An expired entry is dropped and reported as absent.
    pub fn take(&self, headers: &HeaderMap) -> Result<Option<Flash>, WebError> {
        let Some(token) = token_from_headers(headers) else {
            return Ok(None);
        };
        let entry = self.entries.lock()?.by_token.remove(&token);
        Ok(entry
            .filter(|entry| entry.created.elapsed() < self.ttl)
            .map(|entry| entry.flash))
    }

    /// Store `flash` in place of whatever the request still carried.
    pub fn replace(&self, headers: &HeaderMap, flash: Flash) -> Result<Uuid, WebError> {
        self.take(headers)?;
        self.put(flash)
    }

    /// Number of flashes waiting to be shown.
    pub fn pending(&self) -> Result<usize, WebError> {
        Ok(self.entries.lock()?.by_token.len())
    }
}

/// `Set-Cookie` value handing `token` to the browser.
pub fn set_cookie(token: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", FLASH_COOKIE, token)
}

/// `Set-Cookie` value expiring the flash cookie.
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", FLASH_COOKIE)
}

/// Flash token from the request's `Cookie` headers, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
