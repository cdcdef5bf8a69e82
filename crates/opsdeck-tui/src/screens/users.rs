//! User management screen.

use opsdeck_core::table::dates;
use opsdeck_core::table::schema::USER_COLUMNS;
use opsdeck_core::{CollectionSnapshot, ColumnDef, Role, User};

use crate::action::Action;
use crate::screen::ScreenId;
use crate::screens::table::{TableRow, TableScreen};

pub type UsersScreen = TableScreen<User>;

impl TableRow for User {
    const SCREEN: ScreenId = ScreenId::Users;

    fn columns() -> &'static [ColumnDef] {
        USER_COLUMNS
    }

    fn snapshot(action: &Action) -> Option<&CollectionSnapshot<Self>> {
        match action {
            Action::UsersUpdated(snap) => Some(snap),
            _ => None,
        }
    }

    fn detail_title(&self) -> String {
        self.name()
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        let role = match self.role {
            Role::Admin => "Admin",
            Role::User => "User",
        };
        vec![
            ("Role", role.to_owned()),
            ("Job title", self.job_title.clone()),
            ("Email", self.email.clone()),
            ("Joined", dates::display(&self.created_at)),
            ("User ID", self.id.clone()),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    use opsdeck_core::{Environment, FetchState, Location, Record};

    use super::*;
    use crate::component::Component;
    use crate::widgets::data_table::LoadStatus;

    fn user(id: &str, first: &str, last: &str, role: Role) -> User {
        User {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{}@example.com", first.to_lowercase()),
            role,
            job_title: "Engineer".into(),
            created_at: "2023-06-01".into(),
        }
    }

    fn snapshot(state: FetchState<User>, revalidating: bool) -> Action {
        Action::UsersUpdated(CollectionSnapshot {
            env: Environment::Production,
            state,
            revalidating,
            generation: 1,
        })
    }

    fn loaded() -> UsersScreen {
        let mut screen = UsersScreen::new();
        let rows = vec![
            user("a", "Zoe", "Quinn", Role::User),
            user("b", "Adam", "Berg", Role::Admin),
            user("c", "Mia", "Chen", Role::User),
        ];
        screen
            .update(&snapshot(FetchState::Success(Arc::new(rows)), false))
            .unwrap();
        screen
    }

    fn press(screen: &mut UsersScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn visible_ids(screen: &UsersScreen) -> Vec<String> {
        screen.view().visible_rows().map(|r| r.id().to_owned()).collect()
    }

    #[test]
    fn name_column_sorts_by_full_name() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('l'));
        press(&mut screen, KeyCode::Char('A'));
        assert_eq!(visible_ids(&screen), ["b", "c", "a"]);

        press(&mut screen, KeyCode::Char('D'));
        assert_eq!(visible_ids(&screen), ["a", "c", "b"]);
    }

    #[test]
    fn facet_on_focused_role_column() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('f'));
        // second option is "user"
        press(&mut screen, KeyCode::Char('j'));
        press(&mut screen, KeyCode::Char(' '));
        assert_eq!(visible_ids(&screen), ["a", "c"]);

        let counts = screen.view().facet_counts("role");
        assert_eq!(counts.iter().map(|(_, n)| *n).collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn reset_clears_sort_and_filters_but_not_selection() {
        let mut screen = loaded();
        let location = Location::parse(
            r#"/dashboard/user-management?id=b&filters=[{"id":"role","value":["admin"]}]"#,
        );
        screen.update(&Action::Hydrate(location.clone())).unwrap();
        assert_eq!(visible_ids(&screen), ["b"]);

        let Some(Action::Navigate(change)) = press(&mut screen, KeyCode::Char('x')) else {
            panic!("expected a navigation");
        };
        let next = change.apply_to(&location);
        assert_eq!(next.get("filters"), None);
        assert_eq!(next.get("id"), Some("b"));
        assert_eq!(visible_ids(&screen), ["a", "b", "c"]);
    }

    #[test]
    fn loading_snapshot_empties_rows_until_data_arrives() {
        let mut screen = loaded();
        screen.update(&snapshot(FetchState::Loading, false)).unwrap();
        assert_eq!(screen.status(), &LoadStatus::Loading);
        assert_eq!(screen.view().total_len(), 0);
    }

    #[test]
    fn unknown_selection_keeps_detail_open_without_a_record() {
        let mut screen = loaded();
        screen
            .update(&Action::Hydrate(Location::parse(
                "/dashboard/user-management?id=missing",
            )))
            .unwrap();
        assert!(screen.view().selection().is_open());
        assert!(screen.view().selected_record().is_none());
    }
}
