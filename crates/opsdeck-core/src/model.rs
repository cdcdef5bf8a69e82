// ── Table records ──
//
// A `Record` is one row the table view-model can filter, sort and select.
// Column values are looked up by column id so the same sort and filter
// code serves every record type.

use std::borrow::Cow;

use opsdeck_api::{CronJob, User};

/// A row with a stable identifier and string-valued columns.
pub trait Record: Clone + Send + Sync + 'static {
    /// Stable unique id within a collection.
    fn id(&self) -> &str;

    /// Raw value of a column, or `None` when the record has no such field.
    fn field(&self, column: &str) -> Option<Cow<'_, str>>;
}

impl Record for CronJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, column: &str) -> Option<Cow<'_, str>> {
        let value = match column {
            "id" => &self.id,
            "name" => &self.name,
            "userId" => &self.user_id,
            "email" => &self.email,
            "createdAt" => &self.created_at,
            "status" => return Some(Cow::Borrowed(self.status.as_ref())),
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, column: &str) -> Option<Cow<'_, str>> {
        let value = match column {
            "id" => &self.id,
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "email" => &self.email,
            "jobTitle" => &self.job_title,
            "createdAt" => &self.created_at,
            "name" => return Some(Cow::Owned(self.name())),
            "role" => return Some(Cow::Borrowed(self.role.as_ref())),
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_api::{JobStatus, Role};

    #[test]
    fn user_name_is_computed() {
        let user = User {
            id: "u1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@x.io".into(),
            role: Role::Admin,
            job_title: "Engineer".into(),
            created_at: "2024-01-01".into(),
        };
        assert_eq!(user.field("name").as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.field("role").as_deref(), Some("admin"));
        assert_eq!(user.field("status"), None);
    }

    #[test]
    fn cron_job_status_is_lowercase() {
        let job = CronJob {
            id: "j1".into(),
            name: "Backup".into(),
            user_id: "u1".into(),
            status: JobStatus::Inactive,
            created_at: "2024-01-01".into(),
            email: "a@b.io".into(),
        };
        assert_eq!(job.field("status").as_deref(), Some("inactive"));
        assert_eq!(job.id(), "j1");
    }
}
