//! Data bridge: forwards dashboard state changes to the TUI as actions.
//!
//! Runs as a background task subscribed to the collection stores and the
//! session store. Every published snapshot becomes an [`Action`] on the
//! app's channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use opsdeck_core::Dashboard;

use crate::action::Action;

/// Forward the current state once, then every change, until cancelled.
pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut cron_jobs = dashboard.cron_jobs().subscribe();
    let mut users = dashboard.users().subscribe();
    let mut session = dashboard.session().subscribe();

    // Initial snapshots so screens render whatever is already known
    let _ = action_tx.send(Action::SessionChanged(session.borrow_and_update().clone()));
    let _ = action_tx.send(Action::CronJobsUpdated(
        cron_jobs.borrow_and_update().clone(),
    ));
    let _ = action_tx.send(Action::UsersUpdated(users.borrow_and_update().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = session.changed() => {
                let current = session.borrow_and_update().clone();
                debug!(authenticated = current.is_some(), "dispatching SessionChanged");
                let _ = action_tx.send(Action::SessionChanged(current));
            }
            Ok(()) = cron_jobs.changed() => {
                let snap = cron_jobs.borrow_and_update().clone();
                debug!(env = %snap.env, generation = snap.generation, "dispatching CronJobsUpdated");
                let _ = action_tx.send(Action::CronJobsUpdated(snap));
            }
            Ok(()) = users.changed() => {
                let snap = users.borrow_and_update().clone();
                debug!(env = %snap.env, generation = snap.generation, "dispatching UsersUpdated");
                let _ = action_tx.send(Action::UsersUpdated(snap));
            }
        }
    }

    debug!("data bridge shut down");
}
