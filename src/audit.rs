//! Task-scoped auditor used to stamp `created_by` / `last_modified_by`.
//!
//! Writes performed inside [`scope_auditor`] record the given name in the
//! audit columns of every entity they save. Outside a scope the columns stay
//! null and only the timestamps are maintained.

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auditor(pub String);

impl Auditor {
    pub fn new(value: impl Into<String>) -> Self {
        Auditor(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

tokio::task_local! {
    static CURRENT_AUDITOR: RefCell<Option<Auditor>>;
}

pub async fn scope_auditor<Fut, R>(auditor: Auditor, future: Fut) -> R
where
    Fut: Future<Output = R>,
{
    CURRENT_AUDITOR
        .scope(RefCell::new(Some(auditor)), future)
        .await
}

pub fn current_auditor() -> Option<Auditor> {
    CURRENT_AUDITOR
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
}

/// Values written into the audit columns for one save.
#[derive(Debug, Clone)]
pub struct AuditStamp {
    pub by: Option<String>,
    pub at: DateTime<Utc>,
}

impl AuditStamp {
    pub fn now() -> Self {
        Self {
            by: current_auditor().map(|a| a.0),
            at: Utc::now(),
        }
    }
}

/// Generates `stamp_audit` on an entity's `ActiveModel`.
///
/// On insert the creation columns are written; on update they are excluded
/// from the statement so they can never be overwritten, and the
/// modification columns are written instead.
#[macro_export]
macro_rules! impl_audit_stamp {
    () => {
        impl ActiveModel {
            pub(crate) fn stamp_audit(&mut self, insert: bool) {
                let stamp = $crate::audit::AuditStamp::now();
                if insert {
                    self.created_by = sea_orm::ActiveValue::Set(stamp.by);
                    self.created_date = sea_orm::ActiveValue::Set(stamp.at);
                } else {
                    self.created_by = sea_orm::ActiveValue::NotSet;
                    self.created_date = sea_orm::ActiveValue::NotSet;
                    self.last_modified_by = sea_orm::ActiveValue::Set(stamp.by);
                    self.last_modified_date = sea_orm::ActiveValue::Set(Some(stamp.at));
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn auditor_is_visible_inside_scope_only() {
        assert!(current_auditor().is_none());

        let inside = scope_auditor(Auditor::new("clerk-7"), async { current_auditor() }).await;
        assert_eq!(inside, Some(Auditor::new("clerk-7")));

        assert!(current_auditor().is_none());
    }

    #[tokio::test]
    async fn stamp_picks_up_scoped_auditor() {
        let stamp = scope_auditor(Auditor::new("receiving"), async { AuditStamp::now() }).await;
        assert_eq!(stamp.by.as_deref(), Some("receiving"));

        let anonymous = AuditStamp::now();
        assert!(anonymous.by.is_none());
    }
}
