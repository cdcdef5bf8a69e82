// Environment-scoped collection endpoints
//
// Both collections take `?env=` and return a bare JSON array.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CronJob, Environment, User};

impl ApiClient {
    /// List cron jobs for an environment.
    ///
    /// `GET /api/scheduler/cron-jobs?env={env}`
    pub async fn cron_jobs(&self, env: Environment) -> Result<Vec<CronJob>, Error> {
        let mut url = self.api_url("scheduler/cron-jobs")?;
        url.query_pairs_mut().append_pair("env", env.as_ref());
        debug!(%env, "listing cron jobs");
        self.get(url, None).await
    }

    /// List users for an environment.
    ///
    /// `GET /api/users?env={env}`
    pub async fn users(&self, env: Environment) -> Result<Vec<User>, Error> {
        let mut url = self.api_url("users")?;
        url.query_pairs_mut().append_pair("env", env.as_ref());
        debug!(%env, "listing users");
        self.get(url, None).await
    }
}
