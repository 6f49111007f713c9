//! Design version lifecycle: creation, activation, deletion, QR linking and
//! the legacy save-and-publish flow.
//!
//! Operations are generic over the store traits so the same rules apply to
//! the PostgreSQL repositories and to the in-memory store used in tests.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    Business, DesignDocument, DesignVersion, DesignVersionChanges, DesignVersionSummary,
    ListDesignVersionsResponse, NewDesignVersion,
};

/// Storage for design versions. Every lookup is scoped to a business.
#[async_trait::async_trait]
pub trait DesignVersionStore: Send + Sync {
    /// Lists versions newest first.
    async fn list_versions(&self, business_id: Uuid) -> DomainResult<Vec<DesignVersionSummary>>;

    async fn count_versions(&self, business_id: Uuid) -> DomainResult<i64>;

    async fn find_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>>;

    /// Inserts a version. An active insert clears the flag on every other
    /// version of the business first.
    async fn insert_version(&self, version: NewDesignVersion) -> DomainResult<DesignVersion>;

    async fn update_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
        changes: &DesignVersionChanges,
    ) -> DomainResult<Option<DesignVersion>>;

    /// Clears the flag on the other versions of the business, then sets it on
    /// the target. Returns `None` without writing when the target is not in
    /// the business.
    async fn activate_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>>;

    /// Clears the flag on the target only.
    async fn deactivate_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>>;

    /// Deletes an inactive version. Returns `false` when no inactive version
    /// matched.
    async fn delete_inactive_version(&self, business_id: Uuid, version_id: Uuid)
        -> DomainResult<bool>;
}

/// Design-related writes on the business row.
#[async_trait::async_trait]
pub trait BusinessDesignStore: Send + Sync {
    /// Sets or clears the QR pointer. Returns `None` when the business does
    /// not exist.
    async fn set_qr_pointer(
        &self,
        business_id: Uuid,
        version_id: Option<Uuid>,
    ) -> DomainResult<Option<Business>>;

    /// Overwrites the legacy inline design.
    async fn set_inline_design(
        &self,
        business_id: Uuid,
        design: &DesignDocument,
    ) -> DomainResult<()>;
}

/// Outcome of the QR repoint step of a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "message")]
pub enum QrPointerUpdate {
    Linked,
    Failed(String),
}

/// Result of a save-and-publish.
///
/// The version is durable whenever a `SaveOutcome` exists; only the QR
/// pointer update may have failed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub version: DesignVersion,
    pub qr_pointer: QrPointerUpdate,
}

impl SaveOutcome {
    pub fn is_fully_published(&self) -> bool {
        self.qr_pointer == QrPointerUpdate::Linked
    }
}

/// Name given to versions created by the legacy save.
pub fn auto_version_name(now: DateTime<Utc>) -> String {
    format!("Saved {} UTC", now.format("%Y-%m-%d %H:%M:%S"))
}

/// Lists versions together with the active id and the QR pointer.
pub async fn list_versions<S>(store: &S, business: &Business) -> DomainResult<ListDesignVersionsResponse>
where
    S: DesignVersionStore + ?Sized,
{
    let versions = store.list_versions(business.id).await?;
    let active_version_id = versions.iter().find(|v| v.is_active).map(|v| v.id);

    Ok(ListDesignVersionsResponse {
        versions,
        active_version_id,
        qr_design_version_id: business.qr_design_version_id,
    })
}

/// Fetches one version of the business.
pub async fn get_version<S>(store: &S, business_id: Uuid, version_id: Uuid) -> DomainResult<DesignVersion>
where
    S: DesignVersionStore + ?Sized,
{
    store
        .find_version(business_id, version_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Design version"))
}

/// Creates a version, enforcing the per-business cap.
pub async fn create_version<S>(
    store: &S,
    version: NewDesignVersion,
    max_versions: i64,
) -> DomainResult<DesignVersion>
where
    S: DesignVersionStore + ?Sized,
{
    if max_versions > 0 && store.count_versions(version.business_id).await? >= max_versions {
        return Err(DomainError::Conflict(format!(
            "A business can keep at most {} design versions",
            max_versions
        )));
    }

    let created = store.insert_version(version).await?;
    tracing::info!(
        business_id = %created.business_id,
        version_id = %created.id,
        is_active = created.is_active,
        "Design version created"
    );
    Ok(created)
}

/// Applies field changes and an optional activation toggle.
///
/// `set_as_active = Some(true)` runs full activation; `Some(false)` clears the
/// flag on this version only.
pub async fn update_version<S>(
    store: &S,
    business_id: Uuid,
    version_id: Uuid,
    changes: &DesignVersionChanges,
    set_as_active: Option<bool>,
) -> DomainResult<DesignVersion>
where
    S: DesignVersionStore + ?Sized,
{
    let mut version = if changes.is_empty() {
        get_version(store, business_id, version_id).await?
    } else {
        store
            .update_version(business_id, version_id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Design version"))?
    };

    match set_as_active {
        Some(true) if !version.is_active => {
            version = set_active_version(store, business_id, version_id).await?;
        }
        Some(false) if version.is_active => {
            version = store
                .deactivate_version(business_id, version_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Design version"))?;
        }
        _ => {}
    }

    Ok(version)
}

/// Makes `version_id` the only active version of the business.
pub async fn set_active_version<S>(
    store: &S,
    business_id: Uuid,
    version_id: Uuid,
) -> DomainResult<DesignVersion>
where
    S: DesignVersionStore + ?Sized,
{
    let version = store
        .activate_version(business_id, version_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Design version"))?;

    tracing::info!(
        business_id = %business_id,
        version_id = %version_id,
        "Design version activated"
    );
    Ok(version)
}

/// Deletes an inactive version. Active versions are refused and no
/// replacement is promoted.
pub async fn delete_version<S>(store: &S, business_id: Uuid, version_id: Uuid) -> DomainResult<()>
where
    S: DesignVersionStore + ?Sized,
{
    let version = get_version(store, business_id, version_id).await?;
    if version.is_active {
        return Err(DomainError::CannotDeleteActiveVersion);
    }

    // Activated between the read and the delete
    if !store.delete_inactive_version(business_id, version_id).await? {
        return Err(DomainError::CannotDeleteActiveVersion);
    }

    tracing::info!(
        business_id = %business_id,
        version_id = %version_id,
        "Design version deleted"
    );
    Ok(())
}

/// Points the business QR code at one of its versions.
///
/// Does not touch any version's active flag.
pub async fn link_design_to_qr<V, B>(
    versions: &V,
    businesses: &B,
    business_id: Uuid,
    version_id: Uuid,
) -> DomainResult<Business>
where
    V: DesignVersionStore + ?Sized,
    B: BusinessDesignStore + ?Sized,
{
    if versions.find_version(business_id, version_id).await?.is_none() {
        return Err(DomainError::not_found("Design version"));
    }

    let business = businesses
        .set_qr_pointer(business_id, Some(version_id))
        .await?
        .ok_or_else(|| DomainError::not_found("Business"))?;

    tracing::info!(
        business_id = %business_id,
        version_id = %version_id,
        "QR design pointer linked"
    );
    Ok(business)
}

/// Clears the QR pointer. Idempotent.
pub async fn unlink_design_from_qr<B>(businesses: &B, business_id: Uuid) -> DomainResult<Business>
where
    B: BusinessDesignStore + ?Sized,
{
    businesses
        .set_qr_pointer(business_id, None)
        .await?
        .ok_or_else(|| DomainError::not_found("Business"))
}

/// Legacy save-and-publish.
///
/// Inserts the document as a new active version, refreshes the inline
/// fallback and repoints the QR code. Only the insert is required to succeed.
pub async fn save_and_publish<V, B>(
    versions: &V,
    businesses: &B,
    business_id: Uuid,
    design: DesignDocument,
    now: DateTime<Utc>,
) -> DomainResult<SaveOutcome>
where
    V: DesignVersionStore + ?Sized,
    B: BusinessDesignStore + ?Sized,
{
    let version = versions
        .insert_version(NewDesignVersion {
            business_id,
            name: auto_version_name(now),
            description: None,
            design: design.clone(),
            is_active: true,
        })
        .await?;

    if let Err(e) = businesses.set_inline_design(business_id, &design).await {
        tracing::warn!(
            business_id = %business_id,
            error = %e,
            "Failed to refresh inline design"
        );
    }

    let qr_pointer = match link_design_to_qr(versions, businesses, business_id, version.id).await {
        Ok(_) => QrPointerUpdate::Linked,
        Err(e) => {
            tracing::warn!(
                business_id = %business_id,
                version_id = %version.id,
                error = %e,
                "Design saved but QR pointer update failed"
            );
            QrPointerUpdate::Failed(e.to_string())
        }
    };

    Ok(SaveOutcome { version, qr_pointer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Layout;
    use crate::services::design_resolution::{resolve_display_design, DesignSource};
    use crate::test_support::{sample_business, sample_document, sample_version, InMemoryStore};
    use chrono::TimeZone;

    fn second_document() -> DesignDocument {
        DesignDocument {
            header_title: "Cafe Luna Summer".to_string(),
            layout: Layout::Modern,
            ..sample_document()
        }
    }

    fn new_version(business_id: Uuid, name: &str, is_active: bool) -> NewDesignVersion {
        NewDesignVersion {
            business_id,
            name: name.to_string(),
            description: None,
            design: sample_document(),
            is_active,
        }
    }

    #[test]
    fn test_auto_version_name() {
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 9, 3, 7).unwrap();
        assert_eq!(auto_version_name(now), "Saved 2026-05-04 09:03:07 UTC");
    }

    #[test]
    fn test_qr_pointer_update_serialization() {
        assert_eq!(
            serde_json::to_value(QrPointerUpdate::Linked).unwrap(),
            serde_json::json!({"status": "linked"})
        );
        assert_eq!(
            serde_json::to_value(QrPointerUpdate::Failed("boom".into())).unwrap(),
            serde_json::json!({"status": "failed", "message": "boom"})
        );
    }

    #[tokio::test]
    async fn test_set_active_twice_leaves_one_active() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let v1 = store.insert_raw(sample_version(business.id, "v1", true));
        let v2 = store.insert_raw(sample_version(business.id, "v2", false));

        set_active_version(&store, business.id, v2.id).await.unwrap();
        set_active_version(&store, business.id, v2.id).await.unwrap();

        assert_eq!(store.active_ids(business.id), vec![v2.id]);
        assert!(!store.version(v1.id).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_any_activation_sequence_keeps_at_most_one_active() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let ids: Vec<Uuid> = (0..4)
            .map(|i| {
                store
                    .insert_raw(sample_version(business.id, &format!("v{}", i), false))
                    .id
            })
            .collect();

        for &index in &[2usize, 0, 3, 3, 1, 0, 2] {
            set_active_version(&store, business.id, ids[index]).await.unwrap();
            assert_eq!(store.active_ids(business.id), vec![ids[index]]);
        }
    }

    #[tokio::test]
    async fn test_activation_does_not_touch_other_businesses() {
        let business = sample_business();
        let other = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        store.add_business(other.clone());
        let theirs = store.insert_raw(sample_version(other.id, "theirs", true));
        let mine = store.insert_raw(sample_version(business.id, "mine", false));

        set_active_version(&store, business.id, mine.id).await.unwrap();

        assert!(store.version(theirs.id).unwrap().is_active);
        assert_eq!(store.active_ids(business.id), vec![mine.id]);
    }

    #[tokio::test]
    async fn test_activating_foreign_version_is_not_found() {
        let business = sample_business();
        let other = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let mine = store.insert_raw(sample_version(business.id, "mine", true));
        let theirs = store.insert_raw(sample_version(other.id, "theirs", false));

        let result = set_active_version(&store, business.id, theirs.id).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(store.active_ids(business.id), vec![mine.id]);
        assert!(!store.version(theirs.id).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_insert_as_active_matches_explicit_activation() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        create_version(&store, new_version(business.id, "v1", true), 0)
            .await
            .unwrap();
        let v2 = create_version(&store, new_version(business.id, "v2", true), 0)
            .await
            .unwrap();

        assert_eq!(store.active_ids(business.id), vec![v2.id]);
    }

    #[tokio::test]
    async fn test_create_version_respects_cap() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        create_version(&store, new_version(business.id, "v1", false), 2)
            .await
            .unwrap();
        create_version(&store, new_version(business.id, "v2", false), 2)
            .await
            .unwrap();

        let result = create_version(&store, new_version(business.id, "v3", false), 2).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(store.count_versions(business.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_active_version_refused_and_store_unchanged() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let active = store.insert_raw(sample_version(business.id, "live", true));
        let before = store.snapshot();

        let result = delete_version(&store, business.id, active.id).await;
        assert_eq!(result, Err(DomainError::CannotDeleteActiveVersion));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_delete_inactive_version() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let active = store.insert_raw(sample_version(business.id, "live", true));
        let draft = store.insert_raw(sample_version(business.id, "draft", false));

        delete_version(&store, business.id, draft.id).await.unwrap();

        assert!(store.version(draft.id).is_none());
        assert_eq!(store.active_ids(business.id), vec![active.id]);
    }

    #[tokio::test]
    async fn test_delete_foreign_version_is_not_found() {
        let business = sample_business();
        let other = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let theirs = store.insert_raw(sample_version(other.id, "theirs", false));

        let result = delete_version(&store, business.id, theirs.id).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert!(store.version(theirs.id).is_some());
    }

    #[tokio::test]
    async fn test_deleting_qr_target_leaves_resolution_safe() {
        let mut business = sample_business();
        let draft = sample_version(business.id, "draft", false);
        business.qr_design_version_id = Some(draft.id);
        let store = InMemoryStore::with_business(business.clone());
        store.insert_raw(draft.clone());

        delete_version(&store, business.id, draft.id).await.unwrap();

        let current = store.business(business.id).unwrap();
        assert!(resolve_display_design(&store, &current).await.is_none());
    }

    #[tokio::test]
    async fn test_link_foreign_version_is_not_found_and_pointer_unchanged() {
        let business = sample_business();
        let other = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let mine = store.insert_raw(sample_version(business.id, "mine", true));
        let theirs = store.insert_raw(sample_version(other.id, "theirs", true));

        link_design_to_qr(&store, &store, business.id, mine.id)
            .await
            .unwrap();
        let result = link_design_to_qr(&store, &store, business.id, theirs.id).await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(
            store.business(business.id).unwrap().qr_design_version_id,
            Some(mine.id)
        );
    }

    #[tokio::test]
    async fn test_link_does_not_change_active_flags() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let active = store.insert_raw(sample_version(business.id, "live", true));
        let draft = store.insert_raw(sample_version(business.id, "draft", false));

        let updated = link_design_to_qr(&store, &store, business.id, draft.id)
            .await
            .unwrap();

        assert_eq!(updated.qr_design_version_id, Some(draft.id));
        assert_eq!(store.active_ids(business.id), vec![active.id]);
    }

    #[tokio::test]
    async fn test_unlink_falls_back_to_inline_design() {
        let mut business = sample_business();
        business.design = Some(second_document());
        let version = sample_version(business.id, "live", true);
        business.qr_design_version_id = Some(version.id);
        let store = InMemoryStore::with_business(business.clone());
        store.insert_raw(version);

        let updated = unlink_design_from_qr(&store, business.id).await.unwrap();
        assert!(updated.qr_design_version_id.is_none());

        let resolved = resolve_display_design(&store, &updated).await.unwrap();
        assert_eq!(resolved.source, DesignSource::BusinessInline);
        assert_eq!(resolved.design, second_document());

        // Idempotent
        assert!(unlink_design_from_qr(&store, business.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_version_fields_and_flags() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let live = store.insert_raw(sample_version(business.id, "live", true));
        let draft = store.insert_raw(sample_version(business.id, "draft", false));

        let changes = DesignVersionChanges {
            name: Some("Autumn".to_string()),
            description: Some(Some("Seasonal".to_string())),
            design: Some(second_document()),
        };
        let updated = update_version(&store, business.id, draft.id, &changes, Some(true))
            .await
            .unwrap();

        assert_eq!(updated.name, "Autumn");
        assert_eq!(updated.description.as_deref(), Some("Seasonal"));
        assert_eq!(updated.design, Some(second_document()));
        assert!(updated.is_active);
        assert!(!store.version(live.id).unwrap().is_active);

        let cleared = update_version(
            &store,
            business.id,
            draft.id,
            &DesignVersionChanges::default(),
            Some(false),
        )
        .await
        .unwrap();
        assert!(!cleared.is_active);
        assert!(store.active_ids(business.id).is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_version_is_not_found() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let changes = DesignVersionChanges {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };

        let result = update_version(&store, business.id, Uuid::new_v4(), &changes, None).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_versions_reports_pointers() {
        let mut business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let live = store.insert_raw(sample_version(business.id, "live", true));
        let draft = store.insert_raw(sample_version(business.id, "draft", false));
        business.qr_design_version_id = Some(draft.id);

        let listed = list_versions(&store, &business).await.unwrap();
        assert_eq!(listed.versions.len(), 2);
        assert_eq!(listed.active_version_id, Some(live.id));
        assert_eq!(listed.qr_design_version_id, Some(draft.id));
    }

    #[tokio::test]
    async fn test_save_with_failing_qr_repoint_keeps_version() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        store.fail_qr_writes(true);

        let outcome = save_and_publish(&store, &store, business.id, sample_document(), Utc::now())
            .await
            .unwrap();

        assert!(matches!(outcome.qr_pointer, QrPointerUpdate::Failed(_)));
        assert!(!outcome.is_fully_published());
        let stored = store.version(outcome.version.id).unwrap();
        assert!(stored.is_active);
        assert!(store.business(business.id).unwrap().qr_design_version_id.is_none());
    }

    #[tokio::test]
    async fn test_save_fails_when_insert_fails() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        store.fail_writes(true);

        let result = save_and_publish(&store, &store, business.id, sample_document(), Utc::now()).await;
        assert!(matches!(result, Err(DomainError::Upstream(_))));
        assert_eq!(store.count_versions(business.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_first_save_publishes_version() {
        let business = sample_business();
        assert!(business.design.is_none());
        assert!(business.qr_design_version_id.is_none());
        let store = InMemoryStore::with_business(business.clone());
        let d1 = sample_document();

        let outcome = save_and_publish(&store, &store, business.id, d1.clone(), Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome.qr_pointer, QrPointerUpdate::Linked);

        let listed = store.list_versions(business.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        let v1 = store.version(listed[0].id).unwrap();
        assert_eq!(v1.design, Some(d1.clone()));
        assert!(v1.is_active);

        let current = store.business(business.id).unwrap();
        assert_eq!(current.qr_design_version_id, Some(v1.id));
        assert_eq!(current.design, Some(d1.clone()));

        let resolved = resolve_display_design(&store, &current).await.unwrap();
        assert_eq!(resolved.design, d1);
        assert_eq!(resolved.source, DesignSource::QrVersion);
    }

    #[tokio::test]
    async fn test_activation_alone_does_not_move_qr_pointer() {
        let business = sample_business();
        let store = InMemoryStore::with_business(business.clone());
        let d1 = sample_document();
        let d2 = second_document();

        let first = save_and_publish(&store, &store, business.id, d1.clone(), Utc::now())
            .await
            .unwrap();
        let v2 = create_version(
            &store,
            NewDesignVersion {
                business_id: business.id,
                name: "Summer".to_string(),
                description: None,
                design: d2.clone(),
                is_active: false,
            },
            0,
        )
        .await
        .unwrap();
        assert!(!v2.is_active);

        set_active_version(&store, business.id, v2.id).await.unwrap();
        assert!(!store.version(first.version.id).unwrap().is_active);
        assert!(store.version(v2.id).unwrap().is_active);

        let current = store.business(business.id).unwrap();
        let resolved = resolve_display_design(&store, &current).await.unwrap();
        assert_eq!(resolved.design, d1);

        let linked = link_design_to_qr(&store, &store, business.id, v2.id)
            .await
            .unwrap();
        let resolved = resolve_display_design(&store, &linked).await.unwrap();
        assert_eq!(resolved.design, d2);
    }
}
