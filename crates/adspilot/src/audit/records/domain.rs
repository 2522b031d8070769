use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::super::advice::{Advice, ProductId};
use super::super::domain::{AuditInput, AuditModule};
use super::super::scoring::AuditResult;

/// Storage identifier for a saved audit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuditId(pub String);

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    User,
    Admin,
}

impl ViewerRole {
    pub fn from_header(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// The acting user, always passed explicitly to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: String,
    pub role: ViewerRole,
}

impl Viewer {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: ViewerRole::User,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: ViewerRole::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ViewerRole::Admin
    }

    pub fn can_access(&self, record: &AuditRecord) -> bool {
        self.is_admin() || record.user_id == self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "type")]
    pub module: AuditModule,
    #[serde(default)]
    pub inputs: AuditInput,
}

/// A saved audit. Only `note` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditId,
    /// Short id shown to clients and in the CRM ("AP-00042").
    pub audit_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub module: AuditModule,
    pub created_at: DateTime<Utc>,
    pub inputs: AuditInput,
    pub results: AuditResult,
    pub verdict_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AuditRecord {
    pub fn summary_view(&self) -> AuditSummaryView {
        AuditSummaryView {
            id: self.id.clone(),
            audit_id: self.audit_id.clone(),
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            module: self.module,
            created_at: self.created_at,
            verdict_label: self.verdict_label.clone(),
            has_note: self.note.is_some(),
        }
    }
}

/// Pipeline row for dashboards and the admin CRM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSummaryView {
    pub id: AuditId,
    pub audit_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub module: AuditModule,
    pub created_at: DateTime<Utc>,
    pub verdict_label: String,
    pub has_note: bool,
}

/// A saved audit with advice personalised for whoever is reading it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditDetail {
    pub record: AuditRecord,
    pub advice: Vec<Advice>,
}

/// Order event posted by the checkout provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutEvent {
    pub event_id: String,
    pub event_type: String,
    pub user_id: String,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub event_id: String,
    pub user_id: String,
    pub product: ProductId,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    Recorded { product: ProductId },
    Duplicate,
    Ignored { reason: String },
}
