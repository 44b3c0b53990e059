//! Link-graph reconciliation planning.
//!
//! Given the edge rows currently stored for a source article and the desired
//! edge set derived from its new body, [`plan_sync`] computes the minimal
//! batch of inserts, deletes, and target rebinds. Edges present on both sides
//! with an unchanged target are left untouched, preserving row identity for
//! stable rendering. The repository layer applies the plan atomically.

use serde::Serialize;

use crate::types::DbId;

/// A desired outbound reference derived from an article body.
///
/// `target_article_id` is `None` when the referenced title does not resolve
/// to an existing article (an orphan edge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredLink {
    pub target_title: String,
    pub target_article_id: Option<DbId>,
    pub position: i32,
}

/// The subset of a stored edge row the planner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLink {
    pub id: DbId,
    pub target_title: String,
    pub target_article_id: Option<DbId>,
}

/// The reconciliation batch for one source article.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LinkSyncPlan {
    /// Edges to insert (title absent from the stored set).
    pub insert: Vec<DesiredLink>,
    /// Stored edge ids to delete (title absent from the desired set).
    pub delete: Vec<DbId>,
    /// Stored edges whose target resolution changed (orphan became bound, or
    /// the target article was deleted/recreated): `(edge id, new target)`.
    pub rebind: Vec<(DbId, Option<DbId>)>,
}

impl LinkSyncPlan {
    /// Whether applying this plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.insert.is_empty() && self.delete.is_empty() && self.rebind.is_empty()
    }
}

/// Diff the stored edge set against the desired edge set.
///
/// Matching is by lowercased target title, mirroring the storage-side unique
/// index on `(source_article_id, LOWER(target_title))`. Desired entries with
/// a duplicate normalized title are ignored past the first occurrence; the
/// caller is expected to pass an already-deduplicated set.
pub fn plan_sync(current: &[StoredLink], desired: &[DesiredLink]) -> LinkSyncPlan {
    let mut plan = LinkSyncPlan::default();
    let mut matched: Vec<bool> = vec![false; current.len()];

    for want in desired {
        let key = want.target_title.to_lowercase();
        let existing = current
            .iter()
            .enumerate()
            .find(|(i, have)| !matched[*i] && have.target_title.to_lowercase() == key);

        match existing {
            Some((i, have)) => {
                matched[i] = true;
                if have.target_article_id != want.target_article_id {
                    plan.rebind.push((have.id, want.target_article_id));
                }
            }
            None => {
                // Skip duplicate normalized titles already planned for insert.
                let already_planned = plan
                    .insert
                    .iter()
                    .any(|l| l.target_title.to_lowercase() == key);
                if !already_planned {
                    plan.insert.push(want.clone());
                }
            }
        }
    }

    for (i, have) in current.iter().enumerate() {
        if !matched[i] {
            plan.delete.push(have.id);
        }
    }

    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: DbId, title: &str, target: Option<DbId>) -> StoredLink {
        StoredLink {
            id,
            target_title: title.to_string(),
            target_article_id: target,
        }
    }

    fn desired(title: &str, target: Option<DbId>, position: i32) -> DesiredLink {
        DesiredLink {
            target_title: title.to_string(),
            target_article_id: target,
            position,
        }
    }

    #[test]
    fn empty_to_empty_is_noop() {
        let plan = plan_sync(&[], &[]);
        assert!(plan.is_noop());
    }

    #[test]
    fn all_new_edges_are_inserted() {
        let want = vec![desired("X", Some(10), 0), desired("Y", None, 1)];
        let plan = plan_sync(&[], &want);
        assert_eq!(plan.insert, want);
        assert!(plan.delete.is_empty());
        assert!(plan.rebind.is_empty());
    }

    #[test]
    fn removed_title_deletes_kept_title_untouched_new_title_inserts() {
        // Body went from "A [[X]] [[Y]]" to "A [[Y]] [[Z]]".
        let have = vec![stored(1, "X", Some(10)), stored(2, "Y", Some(11))];
        let want = vec![desired("Y", Some(11), 0), desired("Z", None, 1)];
        let plan = plan_sync(&have, &want);
        assert_eq!(plan.delete, vec![1]);
        assert_eq!(plan.insert, vec![desired("Z", None, 1)]);
        assert!(plan.rebind.is_empty());
    }

    #[test]
    fn unchanged_set_is_noop() {
        let have = vec![stored(1, "X", Some(10)), stored(2, "Y", None)];
        let want = vec![desired("X", Some(10), 0), desired("Y", None, 1)];
        assert!(plan_sync(&have, &want).is_noop());
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let have = vec![stored(1, "deploy guide", Some(7))];
        let want = vec![desired("Deploy Guide", Some(7), 0)];
        assert!(plan_sync(&have, &want).is_noop());
    }

    #[test]
    fn orphan_now_resolvable_is_rebound() {
        let have = vec![stored(1, "X", None)];
        let want = vec![desired("X", Some(42), 0)];
        let plan = plan_sync(&have, &want);
        assert_eq!(plan.rebind, vec![(1, Some(42))]);
        assert!(plan.insert.is_empty());
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn deleted_target_is_rebound_to_orphan() {
        let have = vec![stored(1, "X", Some(42))];
        let want = vec![desired("X", None, 0)];
        let plan = plan_sync(&have, &want);
        assert_eq!(plan.rebind, vec![(1, None)]);
    }

    #[test]
    fn duplicate_desired_titles_insert_once() {
        let want = vec![desired("X", Some(1), 0), desired("x", Some(1), 1)];
        let plan = plan_sync(&[], &want);
        assert_eq!(plan.insert.len(), 1);
        assert_eq!(plan.insert[0].target_title, "X");
    }
}
