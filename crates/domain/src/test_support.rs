//! Fixtures and an in-memory store shared by the domain unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    Business, BusinessStatus, DesignDocument, DesignVersion, DesignVersionChanges,
    DesignVersionSummary, Item, Layout, NewDesignVersion, Section,
};
use crate::services::design_versions::{BusinessDesignStore, DesignVersionStore};

pub fn sample_document() -> DesignDocument {
    DesignDocument {
        header_title: "Cafe Luna".to_string(),
        background: "#fffaf0".to_string(),
        background_image: None,
        accent_color: "#c0392b".to_string(),
        logo: Some("https://cdn.example.com/luna.png".to_string()),
        font_family: "Playfair Display".to_string(),
        layout: Layout::Card,
        sections: vec![Section {
            title: "Coffee".to_string(),
            items: vec![
                Item {
                    name: "Espresso".to_string(),
                    price: Some("2.50".to_string()),
                    description: None,
                    image: None,
                },
                Item {
                    name: "Flat White".to_string(),
                    price: Some("3.80".to_string()),
                    description: Some("Double shot".to_string()),
                    image: None,
                },
            ],
        }],
    }
}

pub fn sample_business() -> Business {
    let id = Uuid::new_v4();
    let now = Utc::now();
    Business {
        id,
        owner_id: Uuid::new_v4(),
        slug: format!("cafe-luna-{}", &id.simple().to_string()[..8]),
        name: "Cafe Luna".to_string(),
        description: None,
        phone: None,
        address: None,
        logo_url: None,
        design: None,
        qr_design_version_id: None,
        status: BusinessStatus::Active,
        expires_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_version(business_id: Uuid, name: &str, is_active: bool) -> DesignVersion {
    let now = Utc::now();
    DesignVersion {
        id: Uuid::new_v4(),
        business_id,
        name: name.to_string(),
        description: None,
        design: Some(sample_document()),
        is_active,
        created_at: now,
        updated_at: now,
    }
}

/// Store backed by vectors. No foreign keys: deleting a version leaves any
/// QR pointer to it dangling.
#[derive(Default)]
pub struct InMemoryStore {
    versions: Mutex<Vec<DesignVersion>>,
    businesses: Mutex<Vec<Business>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_qr_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn with_business(business: Business) -> Self {
        let store = Self::default();
        store.add_business(business);
        store
    }

    pub fn add_business(&self, business: Business) {
        self.businesses.lock().unwrap().push(business);
    }

    /// Inserts a version as-is, bypassing activation rules.
    pub fn insert_raw(&self, version: DesignVersion) -> DesignVersion {
        self.versions.lock().unwrap().push(version.clone());
        version
    }

    pub fn version(&self, id: Uuid) -> Option<DesignVersion> {
        self.versions
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    pub fn business(&self, id: Uuid) -> Option<Business> {
        self.businesses
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    pub fn active_ids(&self, business_id: Uuid) -> Vec<Uuid> {
        self.versions
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.business_id == business_id && v.is_active)
            .map(|v| v.id)
            .collect()
    }

    pub fn snapshot(&self) -> (Vec<DesignVersion>, Vec<Business>) {
        (
            self.versions.lock().unwrap().clone(),
            self.businesses.lock().unwrap().clone(),
        )
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_qr_writes(&self, fail: bool) {
        self.fail_qr_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> DomainResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(DomainError::upstream("store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl DesignVersionStore for InMemoryStore {
    async fn list_versions(&self, business_id: Uuid) -> DomainResult<Vec<DesignVersionSummary>> {
        Self::check(&self.fail_reads)?;
        let mut versions: Vec<DesignVersion> = self
            .versions
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.business_id == business_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(versions.into_iter().map(Into::into).collect())
    }

    async fn count_versions(&self, business_id: Uuid) -> DomainResult<i64> {
        Self::check(&self.fail_reads)?;
        let count = self
            .versions
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.business_id == business_id)
            .count();
        Ok(count as i64)
    }

    async fn find_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>> {
        Self::check(&self.fail_reads)?;
        Ok(self
            .version(version_id)
            .filter(|v| v.business_id == business_id))
    }

    async fn insert_version(&self, new: NewDesignVersion) -> DomainResult<DesignVersion> {
        Self::check(&self.fail_writes)?;
        let mut versions = self.versions.lock().unwrap();
        if new.is_active {
            for v in versions.iter_mut().filter(|v| v.business_id == new.business_id) {
                v.is_active = false;
            }
        }
        let now = Utc::now();
        let version = DesignVersion {
            id: Uuid::new_v4(),
            business_id: new.business_id,
            name: new.name,
            description: new.description,
            design: Some(new.design),
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        versions.push(version.clone());
        Ok(version)
    }

    async fn update_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
        changes: &DesignVersionChanges,
    ) -> DomainResult<Option<DesignVersion>> {
        Self::check(&self.fail_writes)?;
        let mut versions = self.versions.lock().unwrap();
        let Some(version) = versions
            .iter_mut()
            .find(|v| v.id == version_id && v.business_id == business_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            version.name = name.clone();
        }
        if let Some(description) = &changes.description {
            version.description = description.clone();
        }
        if let Some(design) = &changes.design {
            version.design = Some(design.clone());
        }
        version.updated_at = Utc::now();
        Ok(Some(version.clone()))
    }

    async fn activate_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>> {
        Self::check(&self.fail_writes)?;
        let mut versions = self.versions.lock().unwrap();
        if !versions
            .iter()
            .any(|v| v.id == version_id && v.business_id == business_id)
        {
            return Ok(None);
        }

        let mut activated = None;
        for v in versions.iter_mut().filter(|v| v.business_id == business_id) {
            if v.id == version_id {
                v.is_active = true;
                v.updated_at = Utc::now();
                activated = Some(v.clone());
            } else {
                v.is_active = false;
            }
        }
        Ok(activated)
    }

    async fn deactivate_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<Option<DesignVersion>> {
        Self::check(&self.fail_writes)?;
        let mut versions = self.versions.lock().unwrap();
        Ok(versions
            .iter_mut()
            .find(|v| v.id == version_id && v.business_id == business_id)
            .map(|v| {
                v.is_active = false;
                v.updated_at = Utc::now();
                v.clone()
            }))
    }

    async fn delete_inactive_version(
        &self,
        business_id: Uuid,
        version_id: Uuid,
    ) -> DomainResult<bool> {
        Self::check(&self.fail_writes)?;
        let mut versions = self.versions.lock().unwrap();
        let before = versions.len();
        versions.retain(|v| !(v.id == version_id && v.business_id == business_id && !v.is_active));
        Ok(versions.len() < before)
    }
}

#[async_trait::async_trait]
impl BusinessDesignStore for InMemoryStore {
    async fn set_qr_pointer(
        &self,
        business_id: Uuid,
        version_id: Option<Uuid>,
    ) -> DomainResult<Option<Business>> {
        Self::check(&self.fail_writes)?;
        Self::check(&self.fail_qr_writes)?;
        let mut businesses = self.businesses.lock().unwrap();
        Ok(businesses.iter_mut().find(|b| b.id == business_id).map(|b| {
            b.qr_design_version_id = version_id;
            b.updated_at = Utc::now();
            b.clone()
        }))
    }

    async fn set_inline_design(
        &self,
        business_id: Uuid,
        design: &DesignDocument,
    ) -> DomainResult<()> {
        Self::check(&self.fail_writes)?;
        let mut businesses = self.businesses.lock().unwrap();
        if let Some(b) = businesses.iter_mut().find(|b| b.id == business_id) {
            b.design = Some(design.clone());
            b.updated_at = Utc::now();
        }
        Ok(())
    }
}
