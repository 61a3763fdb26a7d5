use crate::types::{Scope, Secret, SecretsViewState};

pub(crate) fn now_iso() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Trims compose input; whitespace-only text is rejected before any network
/// call is considered.
pub(crate) fn normalized_secret_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Records a newly issued list fetch and returns its staleness tag. The scope
/// switches immediately so the UI reflects the latest request, but the list
/// itself is only replaced by the response carrying the current tag.
pub(crate) fn begin_fetch(view: &mut SecretsViewState, scope: Scope) -> u64 {
    view.scope = scope;
    view.fetch_seq += 1;
    view.fetch_seq
}

fn is_current(view: &SecretsViewState, tag: u64) -> bool {
    view.fetch_seq == tag
}

/// Applies a successful list response. Returns false (and leaves the view
/// untouched) when a newer fetch was issued in the meantime; the last
/// requested scope wins, not whichever response lands last.
pub(crate) fn finish_fetch_ok(
    view: &mut SecretsViewState,
    tag: u64,
    secrets: Vec<Secret>,
) -> bool {
    if !is_current(view, tag) {
        return false;
    }
    view.secrets = secrets;
    view.last_updated_at = Some(now_iso());
    true
}

/// A failed fetch leaves the last-known-good list in place. Returns whether
/// the failure belongs to the current fetch (stale failures are ignored
/// outright, not surfaced).
pub(crate) fn finish_fetch_err(view: &SecretsViewState, tag: u64) -> bool {
    is_current(view, tag)
}

/// Prepends a freshly created secret and clears the compose box.
pub(crate) fn apply_created(view: &mut SecretsViewState, secret: Secret) {
    view.secrets.insert(0, secret);
    view.compose_text.clear();
}

pub(crate) fn contains_id(view: &SecretsViewState, id: &str) -> bool {
    view.secrets.iter().any(|s| s.id == id)
}

/// Splices the confirmed-deleted entry out of the list by identifier.
pub(crate) fn remove_by_id(view: &mut SecretsViewState, id: &str) -> bool {
    let before = view.secrets.len();
    view.secrets.retain(|s| s.id != id);
    view.secrets.len() != before
}

/// Clearing the session drops owner-scoped state: the scope falls back to
/// the public feed and any open detail view closes. The next fetch is always
/// `All`, never `Mine`.
pub(crate) fn reset_for_logout(view: &mut SecretsViewState) {
    view.scope = Scope::All;
    view.selected = None;
}

/// The compose box renders only on the public feed and only for an
/// authenticated viewer.
pub(crate) fn compose_visible(scope: Scope, authenticated: bool) -> bool {
    scope == Scope::All && authenticated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(id: &str, text: &str) -> Secret {
        Secret {
            id: id.to_string(),
            text: text.to_string(),
            created_at: None,
        }
    }

    fn view_with(secrets: Vec<Secret>) -> SecretsViewState {
        SecretsViewState {
            secrets,
            ..Default::default()
        }
    }

    #[test]
    fn whitespace_only_compose_text_is_rejected() {
        assert_eq!(normalized_secret_text(""), None);
        assert_eq!(normalized_secret_text("   "), None);
        assert_eq!(normalized_secret_text("\n\t "), None);
        assert_eq!(normalized_secret_text("  hello  "), Some("hello".to_string()));
    }

    #[test]
    fn created_secret_lands_at_index_zero_and_clears_compose() {
        let mut view = view_with(vec![secret("s0", "old")]);
        view.compose_text = "hello".to_string();

        apply_created(&mut view, secret("s1", "hello"));

        assert_eq!(view.secrets.len(), 2);
        assert_eq!(view.secrets[0].id, "s1");
        assert_eq!(view.secrets[1].id, "s0");
        assert!(view.compose_text.is_empty());
    }

    #[test]
    fn delete_removes_exactly_one_entry_by_id() {
        let mut view = view_with(vec![secret("a", "1"), secret("b", "2"), secret("c", "3")]);

        assert!(contains_id(&view, "b"));
        assert!(remove_by_id(&mut view, "b"));

        assert_eq!(view.secrets.len(), 2);
        assert!(!contains_id(&view, "b"));
        assert_eq!(view.secrets[0].id, "a");
        assert_eq!(view.secrets[1].id, "c");
    }

    #[test]
    fn delete_of_unknown_id_changes_nothing() {
        let mut view = view_with(vec![secret("a", "1"), secret("b", "2")]);
        assert!(!remove_by_id(&mut view, "zzz"));
        assert_eq!(view.secrets.len(), 2);
    }

    #[test]
    fn successful_fetch_replaces_list_wholesale_in_order() {
        let mut view = view_with(vec![secret("old", "x")]);
        let tag = begin_fetch(&mut view, Scope::All);

        assert!(finish_fetch_ok(&mut view, tag, vec![secret("n1", "1"), secret("n2", "2")]));
        assert_eq!(view.secrets[0].id, "n1");
        assert_eq!(view.secrets[1].id, "n2");
        assert!(view.last_updated_at.is_some());
    }

    #[test]
    fn failed_fetch_leaves_last_known_good_list() {
        let mut view = view_with(vec![secret("keep", "x")]);
        let tag = begin_fetch(&mut view, Scope::Mine);

        assert!(finish_fetch_err(&view, tag));
        assert_eq!(view.secrets.len(), 1);
        assert_eq!(view.secrets[0].id, "keep");
    }

    #[test]
    fn late_response_for_superseded_scope_is_discarded() {
        // All -> Mine -> All, with the Mine response resolving after the
        // second All response. The displayed list must be the All result.
        let mut view = SecretsViewState::default();

        let _all_1 = begin_fetch(&mut view, Scope::All);
        let mine = begin_fetch(&mut view, Scope::Mine);
        let all_2 = begin_fetch(&mut view, Scope::All);

        assert!(finish_fetch_ok(&mut view, all_2, vec![secret("pub", "public")]));
        assert!(!finish_fetch_ok(&mut view, mine, vec![secret("own", "private")]));

        assert_eq!(view.scope, Scope::All);
        assert_eq!(view.secrets.len(), 1);
        assert_eq!(view.secrets[0].id, "pub");
    }

    #[test]
    fn stale_failure_is_not_surfaced() {
        let mut view = SecretsViewState::default();
        let first = begin_fetch(&mut view, Scope::Mine);
        let _second = begin_fetch(&mut view, Scope::All);
        assert!(!finish_fetch_err(&view, first));
    }

    #[test]
    fn scope_follows_latest_request_immediately() {
        let mut view = SecretsViewState::default();
        begin_fetch(&mut view, Scope::Mine);
        assert_eq!(view.scope, Scope::Mine);
        begin_fetch(&mut view, Scope::All);
        assert_eq!(view.scope, Scope::All);
    }

    #[test]
    fn logout_reverts_to_public_scope_and_closes_detail() {
        let mut view = view_with(vec![secret("a", "1")]);
        view.scope = Scope::Mine;
        view.selected = Some(secret("a", "1"));

        reset_for_logout(&mut view);

        assert_eq!(view.scope, Scope::All);
        assert!(view.selected.is_none());
        // The stale owner-scoped list stays until the triggered re-fetch
        // replaces it.
        assert_eq!(view.secrets.len(), 1);
    }

    #[test]
    fn compose_only_visible_on_authenticated_public_feed() {
        assert!(compose_visible(Scope::All, true));
        assert!(!compose_visible(Scope::All, false));
        assert!(!compose_visible(Scope::Mine, true));
        assert!(!compose_visible(Scope::Mine, false));
    }
}
