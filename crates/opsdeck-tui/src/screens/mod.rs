//! Screen implementations. Each screen is a top-level Component.

pub mod home;
pub mod login;
pub mod scheduler;
pub mod table;
pub mod users;

use opsdeck_core::Dashboard;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per screen.
pub fn create_screens(dashboard: &Dashboard) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Login,
            Box::new(login::LoginScreen::new(dashboard.clone())),
        ),
        (ScreenId::Home, Box::new(home::HomeScreen::new())),
        (
            ScreenId::Scheduler,
            Box::new(scheduler::SchedulerScreen::new()),
        ),
        (ScreenId::Users, Box::new(users::UsersScreen::new())),
    ]
}
