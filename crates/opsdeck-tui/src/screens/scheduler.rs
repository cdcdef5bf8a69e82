//! Scheduler screen: the cron job table.

use opsdeck_core::table::dates;
use opsdeck_core::table::schema::{CRON_JOB_COLUMNS, STATUS_OPTIONS};
use opsdeck_core::{CollectionSnapshot, ColumnDef, CronJob};

use crate::action::Action;
use crate::screen::ScreenId;
use crate::screens::table::{TableRow, TableScreen};

pub type SchedulerScreen = TableScreen<CronJob>;

fn status_label(raw: &str) -> &str {
    STATUS_OPTIONS
        .iter()
        .find(|o| o.value == raw)
        .map_or(raw, |o| o.label)
}

impl TableRow for CronJob {
    const SCREEN: ScreenId = ScreenId::Scheduler;

    fn columns() -> &'static [ColumnDef] {
        CRON_JOB_COLUMNS
    }

    fn snapshot(action: &Action) -> Option<&CollectionSnapshot<Self>> {
        match action {
            Action::CronJobsUpdated(snap) => Some(snap),
            _ => None,
        }
    }

    fn detail_title(&self) -> String {
        self.name.clone()
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Status", status_label(self.status.as_ref()).to_owned()),
            ("Owner", self.email.clone()),
            ("User ID", self.user_id.clone()),
            ("Created", dates::display(&self.created_at)),
            ("Job ID", self.id.clone()),
        ]
    }
}
