//! Resolution of the design shown on the public menu.
//!
//! Priority order, first match wins:
//! 1. The version referenced by the business QR pointer, when it exists
//!    within the business scope and has a readable body
//! 2. The legacy inline design stored on the business
//! 3. No design, in which case callers render the categorized menu
//!
//! Lookup failures never surface to callers; they fall through to the next
//! source.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::design_versions::DesignVersionStore;
use crate::models::{Business, DesignDocument, DesignVersion};

/// Where a resolved design came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignSource {
    QrVersion,
    BusinessInline,
}

/// A design selected for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDesign {
    pub source: DesignSource,
    /// Set when the design came from a version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<Uuid>,
    pub design: DesignDocument,
}

/// Pure resolution over already-fetched inputs.
///
/// `qr_version` is the outcome of looking up the QR pointer. It is ignored
/// unless it belongs to `business`, matches the pointer and carries a body.
pub fn resolve_design(
    business: &Business,
    qr_version: Option<DesignVersion>,
) -> Option<ResolvedDesign> {
    let from_qr = qr_version.and_then(|version| {
        let points_here = business.qr_design_version_id == Some(version.id)
            && version.business_id == business.id;
        if !points_here {
            return None;
        }
        version.design.map(|design| ResolvedDesign {
            source: DesignSource::QrVersion,
            version_id: Some(version.id),
            design,
        })
    });

    from_qr.or_else(|| {
        business.design.clone().map(|design| ResolvedDesign {
            source: DesignSource::BusinessInline,
            version_id: None,
            design,
        })
    })
}

/// Resolves the display design for a business.
///
/// Never fails: a dangling pointer or an unreachable store degrades to the
/// inline design, then to no design.
pub async fn resolve_display_design<S>(store: &S, business: &Business) -> Option<ResolvedDesign>
where
    S: DesignVersionStore + ?Sized,
{
    let qr_version = match business.qr_design_version_id {
        Some(version_id) => match store.find_version(business.id, version_id).await {
            Ok(Some(version)) => {
                if version.design.is_none() {
                    tracing::debug!(
                        business_id = %business.id,
                        version_id = %version_id,
                        "QR design version has no readable body"
                    );
                }
                Some(version)
            }
            Ok(None) => {
                tracing::debug!(
                    business_id = %business.id,
                    version_id = %version_id,
                    "QR design pointer is dangling"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    business_id = %business.id,
                    version_id = %version_id,
                    error = %e,
                    "Failed to load QR design version, falling back"
                );
                None
            }
        },
        None => None,
    };

    resolve_design(business, qr_version)
}
