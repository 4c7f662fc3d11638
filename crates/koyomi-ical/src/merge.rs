//! Duplicate-identifier merge engine.
//!
//! Folds a closed child component into its parent, reconciling repeated UIDs
//! and recurrence overrides. Real-world feeds deliver revisions and
//! overrides in any order, including an override before the base rule it
//! modifies.

use uuid::Uuid;

use crate::core::{CalendarComponent, keys};

/// Folds a closed `child` component into `parent`'s component map.
///
/// - No UID: stored under a freshly generated key, unique per document.
/// - New UID: stored directly.
/// - Repeated UID without RECURRENCE-ID: shallow merge, the child's fields
///   overwrite and fields only on the existing record are retained (models a
///   later revision of the same item, e.g. a bumped sequence number).
/// - A child with a RECURRENCE-ID is additionally copied (minus its own
///   `recurrences` table) into the canonical record's `recurrences` table,
///   keyed by the recurrence-id's date-only key. This also applies when the
///   child itself just became canonical, which is what keeps an override
///   that arrived before its base rule recoverable.
pub fn fold_into(child: CalendarComponent, parent: &mut CalendarComponent) {
    let Some(uid) = child.uid().map(str::to_owned) else {
        if child.properties.contains_key(keys::UID) {
            tracing::warn!("UID present but not textual, generating a key");
        }
        let key = Uuid::new_v4().to_string();
        parent.components.insert(key, child);
        return;
    };

    let override_key = child.recurrence_key();
    let override_copy = child.has_recurrence_id().then(|| {
        let mut copy = child.clone();
        copy.recurrences = None;
        copy
    });

    match parent.components.get_mut(&uid) {
        Some(existing) => {
            if override_copy.is_none() {
                shallow_merge(existing, child);
            }
            // With a recurrence-id the canonical record's own fields are
            // left untouched; the child only lands in the override table.
        }
        None => {
            parent.components.insert(uid.clone(), child);
        }
    }

    let Some(canonical) = parent.components.get_mut(&uid) else {
        return;
    };

    if let Some(copy) = override_copy {
        match override_key {
            Some(date_key) => {
                canonical
                    .recurrences
                    .get_or_insert_with(Default::default)
                    .insert(date_key, copy);
            }
            None => {
                tracing::error!(uid, "recurrence-id did not decode as a date, override dropped");
            }
        }
    }

    // An override that became canonical before its base rule arrived leaves
    // a stray recurrence-id on the canonical record once the rule shows up.
    if canonical.properties.contains_key(keys::RRULE) && canonical.has_recurrence_id() {
        canonical.properties.remove(keys::RECURRENCE_ID);
    }
}

/// Overwrites every field the child carries onto the existing record:
/// properties, closed children, and the override table when present.
fn shallow_merge(existing: &mut CalendarComponent, child: CalendarComponent) {
    existing.kind = child.kind;
    existing.name = child.name;
    existing.properties.extend(child.properties);
    existing.components.extend(child.components);
    if child.recurrences.is_some() {
        existing.recurrences = child.recurrences;
    }
}
