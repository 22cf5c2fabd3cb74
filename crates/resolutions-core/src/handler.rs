//! Request handling for the resolutions API
//!
//! [`ResolutionHandler`] validates input, works against the shared store and
//! shapes the response. It keeps no state of its own between calls. Every
//! operation takes the store lock once and holds it for its whole
//! lookup-and-mutate sequence, so concurrent requests cannot race on the
//! identifier counter or the collection.

use crate::error::{ResolutionError, Result};
use crate::resolution::{
    CreateResolution, ListFilter, Resolution, ResolutionId, ResolutionList, UpdateResolution,
};
use crate::store::{ResolutionStore, SharedStore};
use crate::RESOURCE_PATH;

/// Detail reported for a non-positive id on get and delete
pub const ID_NOT_POSITIVE: &str = "id must be greater than zero";

/// Detail reported for a missing or non-positive id on update
pub const ID_REQUIRED: &str = "id is required";

/// Detail reported for a missing or blank title
pub const TITLE_REQUIRED: &str = "title is required";

/// Detail reported for an unparsable `isDone` filter
pub const IS_DONE_INVALID: &str = "isDone must be true or false";

/// Outcome of a successful create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    /// Path of the get-by-id operation for the new record
    pub location: String,

    /// The stored record
    pub resolution: Resolution,
}

/// Stateless request handler over a shared store
#[derive(Debug, Clone)]
pub struct ResolutionHandler {
    store: SharedStore,
}

impl Default for ResolutionHandler {
    fn default() -> Self {
        Self::new(ResolutionStore::shared())
    }
}

impl ResolutionHandler {
    /// Handler working against the given store
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The store this handler works against
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Number of stored records
    pub fn count(&self) -> usize {
        self.store.lock().len()
    }

    /// List records, optionally filtered by completion flag and title
    pub fn list(&self, filter: &ListFilter) -> Result<ResolutionList> {
        let done = match filter.is_done.as_deref() {
            Some(raw) => match parse_flag(raw) {
                Some(value) => Some(value),
                None => {
                    tracing::warn!(is_done = %raw, "Rejected isDone filter");
                    return Err(ResolutionError::validation(IS_DONE_INVALID));
                }
            },
            None => None,
        };
        let title = filter
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty());

        let store = self.store.lock();
        let items: Vec<Resolution> = store
            .list()
            .iter()
            .filter(|r| done.map_or(true, |d| r.is_done == d))
            .filter(|r| title.map_or(true, |t| r.title_contains(t)))
            .cloned()
            .collect();

        tracing::debug!(
            is_done = ?done,
            title = ?title,
            matched = items.len(),
            "Listed resolutions"
        );
        Ok(ResolutionList { items })
    }

    /// Fetch a single record
    pub fn get(&self, id: ResolutionId) -> Result<Resolution> {
        if id <= 0 {
            return Err(ResolutionError::validation(ID_NOT_POSITIVE));
        }

        let store = self.store.lock();
        let resolution = store
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| ResolutionError::not_found(id))?;

        tracing::debug!(id, "Fetched resolution");
        Ok(resolution)
    }

    /// Create a record from a non-blank title
    pub fn create(&self, request: CreateResolution) -> Result<Created> {
        let title = required_title(request.title.as_deref())?;

        let resolution = self.store.lock().add(title);

        tracing::info!(id = resolution.id, title = %resolution.title, "Created resolution");
        Ok(Created {
            location: format!("{}/{}", RESOURCE_PATH, resolution.id),
            resolution,
        })
    }

    /// Replace title and completion flag of an existing record
    ///
    /// Checks run in a fixed order: id presence, id agreement, title, and
    /// only then existence. A failed check leaves the store untouched.
    pub fn update(&self, id: ResolutionId, request: UpdateResolution) -> Result<Resolution> {
        let body_id = match request.id {
            Some(body_id) if id > 0 => body_id,
            _ => return Err(ResolutionError::validation(ID_REQUIRED)),
        };
        if id != body_id {
            tracing::warn!(route_id = id, body_id, "Route id does not match body id");
            return Err(ResolutionError::id_mismatch(id, body_id));
        }
        let title = required_title(request.title.as_deref())?;

        let mut store = self.store.lock();
        let resolution = store
            .get_by_id_mut(id)
            .ok_or_else(|| ResolutionError::not_found(id))?;
        resolution.apply_update(title, request.is_done);

        tracing::info!(id, is_done = resolution.is_done, "Updated resolution");
        Ok(resolution.clone())
    }

    /// Remove a record; its id is never handed out again
    pub fn delete(&self, id: ResolutionId) -> Result<()> {
        if id <= 0 {
            return Err(ResolutionError::validation(ID_NOT_POSITIVE));
        }

        self.store
            .lock()
            .remove(id)
            .ok_or_else(|| ResolutionError::not_found(id))?;

        tracing::info!(id, "Deleted resolution");
        Ok(())
    }
}

fn required_title(title: Option<&str>) -> Result<&str> {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ResolutionError::validation(TITLE_REQUIRED)),
    }
}

/// `true`/`false`, ASCII case-insensitive, surrounding whitespace ignored
fn parse_flag(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ID_MISMATCH, NOT_FOUND, VALIDATION_FAILED};

    fn handler() -> ResolutionHandler {
        ResolutionHandler::default()
    }

    fn create(handler: &ResolutionHandler, title: &str) -> Resolution {
        handler.create(CreateResolution::new(title)).unwrap().resolution
    }

    fn assert_bad_request(err: ResolutionError, message: &str, details: &[&str]) {
        assert_eq!(err.kind(), "BadRequest");
        assert_eq!(err.message(), message);
        assert_eq!(err.details(), details);
    }

    #[test]
    fn test_create_trims_and_stamps() {
        let handler = handler();
        let created = handler.create(CreateResolution::new("  Learn Go  ")).unwrap();

        assert_eq!(created.resolution.title, "Learn Go");
        assert!(!created.resolution.is_done);
        assert!(created.resolution.id > 0);
        assert!(created.resolution.updated_at.is_none());
        assert_eq!(created.location, format!("/api/resolutions/{}", created.resolution.id));
    }

    #[test]
    fn test_create_requires_title() {
        let handler = handler();

        for request in [
            CreateResolution::default(),
            CreateResolution::new(""),
            CreateResolution::new("   "),
        ] {
            let err = handler.create(request).unwrap_err();
            assert_bad_request(err, VALIDATION_FAILED, &[TITLE_REQUIRED]);
        }
        assert_eq!(handler.count(), 0);
    }

    #[test]
    fn test_get_returns_created_record() {
        let handler = handler();
        let created = create(&handler, "Learn Go");

        assert_eq!(handler.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_get_rejects_non_positive_id_without_store_access() {
        let handler = handler();
        let _guard = handler.store().lock();

        for id in [0, -1] {
            let err = handler.get(id).unwrap_err();
            assert_bad_request(err, VALIDATION_FAILED, &[ID_NOT_POSITIVE]);

            let err = handler.delete(id).unwrap_err();
            assert_bad_request(err, VALIDATION_FAILED, &[ID_NOT_POSITIVE]);
        }
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let err = handler().get(12).unwrap_err();

        assert_eq!(err.kind(), "NotFound");
        assert_eq!(err.message(), NOT_FOUND);
        assert_eq!(err.details(), ["id: 12"]);
    }

    #[test]
    fn test_list_filters_by_done() {
        let handler = handler();
        let first = create(&handler, "Learn Go");
        let second = create(&handler, "Run");
        handler
            .update(second.id, UpdateResolution::new(second.id, "Run", true))
            .unwrap();

        let done = handler.list(&ListFilter::new().with_is_done("true")).unwrap();
        assert_eq!(done.items.len(), 1);
        assert_eq!(done.items[0].id, second.id);

        let open = handler.list(&ListFilter::new().with_is_done("FALSE")).unwrap();
        assert_eq!(open.items.len(), 1);
        assert_eq!(open.items[0].id, first.id);
    }

    #[test]
    fn test_list_filters_by_title_case_insensitively() {
        let handler = handler();
        create(&handler, "Learn Go");
        create(&handler, "Run");

        let found = handler.list(&ListFilter::new().with_title("learn")).unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].title, "Learn Go");

        let all = handler.list(&ListFilter::new().with_title("   ")).unwrap();
        assert_eq!(all.items.len(), 2);
    }

    #[test]
    fn test_list_title_needle_is_not_trimmed() {
        let handler = handler();
        create(&handler, "Learn Go");

        let leading = handler.list(&ListFilter::new().with_title(" Go")).unwrap();
        assert_eq!(leading.items.len(), 1);

        let trailing = handler.list(&ListFilter::new().with_title("Go ")).unwrap();
        assert!(trailing.items.is_empty());
    }

    #[test]
    fn test_list_combines_filters() {
        let handler = handler();
        let go = create(&handler, "Learn Go");
        create(&handler, "Learn Rust");
        handler
            .update(go.id, UpdateResolution::new(go.id, "Learn Go", true))
            .unwrap();

        let filter = ListFilter::new().with_is_done("true").with_title("LEARN");
        let items = handler.list(&filter).unwrap().items;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, go.id);
    }

    #[test]
    fn test_list_rejects_invalid_done_flag() {
        let handler = handler();

        for raw in ["yes", "1", "0", "", "truthy"] {
            let err = handler.list(&ListFilter::new().with_is_done(raw)).unwrap_err();
            assert_bad_request(err, VALIDATION_FAILED, &[IS_DONE_INVALID]);
        }
    }

    #[test]
    fn test_list_keeps_insertion_order_after_updates() {
        let handler = handler();
        let a = create(&handler, "a");
        let b = create(&handler, "b");
        let c = create(&handler, "c");
        handler.update(a.id, UpdateResolution::new(a.id, "a2", false)).unwrap();

        let ids: Vec<_> = handler
            .list(&ListFilter::new())
            .unwrap()
            .items
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_update_replaces_fields() {
        let handler = handler();
        let created = create(&handler, "Learn Go");

        let updated = handler
            .update(created.id, UpdateResolution::new(created.id, "  Learn Go well ", true))
            .unwrap();

        assert_eq!(updated.title, "Learn Go well");
        assert!(updated.is_done);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
        assert_eq!(handler.get(created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_validation_order() {
        let handler = handler();
        let created = create(&handler, "Learn Go");

        let err = handler.update(0, UpdateResolution::new(0, "", false)).unwrap_err();
        assert_bad_request(err, VALIDATION_FAILED, &[ID_REQUIRED]);

        let err = handler
            .update(created.id, UpdateResolution::default())
            .unwrap_err();
        assert_bad_request(err, VALIDATION_FAILED, &[ID_REQUIRED]);

        let err = handler.update(3, UpdateResolution::new(5, "", false)).unwrap_err();
        assert_bad_request(err, ID_MISMATCH, &["route id: 3", "body id: 5"]);

        let err = handler
            .update(created.id, UpdateResolution::new(created.id, "  ", true))
            .unwrap_err();
        assert_bad_request(err, VALIDATION_FAILED, &[TITLE_REQUIRED]);

        let err = handler.update(99, UpdateResolution::new(99, "x", true)).unwrap_err();
        assert_eq!(err.kind(), "NotFound");
        assert_eq!(err.details(), ["id: 99"]);

        assert_eq!(handler.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_delete_then_get_is_not_found_and_id_not_reused() {
        let handler = handler();
        let first = create(&handler, "a");

        handler.delete(first.id).unwrap();

        assert_eq!(handler.get(first.id).unwrap_err().kind(), "NotFound");
        let err = handler.delete(first.id).unwrap_err();
        assert_eq!(err.details(), [format!("id: {}", first.id)]);

        let second = create(&handler, "b");
        assert!(second.id > first.id);
    }

    #[test]
    fn test_concurrent_creates_get_distinct_ids() {
        let handler = handler();

        let workers: Vec<_> = (0..8)
            .map(|n| {
                let handler = handler.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|i| create(&handler, &format!("w{n}-{i}")).id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<_> = workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 200);
        assert_eq!(handler.count(), 200);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag(" false "), Some(false));
        assert_eq!(parse_flag("1"), None);
        assert_eq!(parse_flag(""), None);
    }
}
