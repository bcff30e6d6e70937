//! Role and capability checks for dictionary mutations.
//!
//! Every mutating handler consults this table before touching the store.
//! Roles are strictly ordered; explicit capability tokens on a user may
//! extend the role defaults but never restrict them.

use uuid::Uuid;

/// User role, in increasing order of privilege.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    User,
    Editor,
    Admin,
    Superadmin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "editor" => Some(Self::Editor),
            "admin" => Some(Self::Admin),
            "superadmin" => Some(Self::Superadmin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }

    /// Elevated roles see entries in every moderation state.
    pub fn is_elevated(self) -> bool {
        self >= Role::Editor
    }
}

/// An action a caller may attempt against the dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    CreateWord,
    EditWord,
    DeleteWord,
    ApproveWord,
    ManageUsers,
    AssignRoles,
    ViewAnalytics,
}

impl Action {
    /// The explicit capability token that grants this action outside the
    /// role defaults.
    pub fn capability(self) -> &'static str {
        match self {
            Self::CreateWord => "create_words",
            Self::EditWord => "edit_words",
            Self::DeleteWord => "delete_words",
            Self::ApproveWord => "approve_words",
            Self::ManageUsers => "manage_users",
            Self::AssignRoles => "assign_roles",
            Self::ViewAnalytics => "view_analytics",
        }
    }
}

/// Default permission table: what each role may do without explicit grants.
pub fn role_allows(role: Role, action: Action) -> bool {
    match action {
        Action::CreateWord | Action::EditWord => role >= Role::Editor,
        Action::DeleteWord
        | Action::ApproveWord
        | Action::ManageUsers
        | Action::AssignRoles
        | Action::ViewAnalytics => role >= Role::Admin,
    }
}

/// Whether a caller with `role` and explicit capability `grants` may
/// perform `action`.
pub fn allows(role: Role, grants: &[String], action: Action) -> bool {
    role_allows(role, action) || grants.iter().any(|g| g == action.capability())
}

/// Ownership rule for edits: editors may only touch their own entries;
/// admin and superadmin may edit anything.
pub fn can_edit_entry(role: Role, actor_id: Uuid, created_by: Option<Uuid>) -> bool {
    role >= Role::Admin || created_by == Some(actor_id)
}

/// Role-assignment ceiling. The actor may not grant a role exceeding their
/// own, may not touch a user currently outranking them, and only a
/// superadmin may grant or revoke admin and superadmin.
pub fn can_assign(actor: Role, current: Role, target: Role) -> bool {
    if actor < Role::Admin {
        return false;
    }
    if target > actor || current > actor {
        return false;
    }
    if target >= Role::Admin || current >= Role::Admin {
        return actor == Role::Superadmin;
    }
    true
}

/// Moderation state of a freshly created entry: admin-authored entries go
/// live immediately, editor-authored entries await approval.
pub fn initial_status(role: Role) -> crate::entity::word::WordStatus {
    use crate::entity::word::WordStatus;
    if role >= Role::Admin {
        WordStatus::Approved
    } else {
        WordStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::word::WordStatus;

    #[test]
    fn role_ordering() {
        assert!(Role::User < Role::Editor);
        assert!(Role::Editor < Role::Admin);
        assert!(Role::Admin < Role::Superadmin);
        assert!(!Role::User.is_elevated());
        assert!(Role::Editor.is_elevated());
    }

    #[test]
    fn role_parse_round_trip() {
        for role in [Role::User, Role::Editor, Role::Admin, Role::Superadmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("moderator"), None);
    }

    #[test]
    fn default_table_matches_privilege_tiers() {
        // user: nothing
        for action in [
            Action::CreateWord,
            Action::EditWord,
            Action::DeleteWord,
            Action::ApproveWord,
            Action::ManageUsers,
            Action::AssignRoles,
            Action::ViewAnalytics,
        ] {
            assert!(!role_allows(Role::User, action));
        }

        // editor: create and edit only
        assert!(role_allows(Role::Editor, Action::CreateWord));
        assert!(role_allows(Role::Editor, Action::EditWord));
        assert!(!role_allows(Role::Editor, Action::DeleteWord));
        assert!(!role_allows(Role::Editor, Action::ApproveWord));
        assert!(!role_allows(Role::Editor, Action::ManageUsers));

        // admin and superadmin: everything
        for role in [Role::Admin, Role::Superadmin] {
            for action in [
                Action::CreateWord,
                Action::EditWord,
                Action::DeleteWord,
                Action::ApproveWord,
                Action::ManageUsers,
                Action::ViewAnalytics,
            ] {
                assert!(role_allows(role, action));
            }
        }
    }

    #[test]
    fn explicit_grants_extend_role_defaults() {
        let grants = vec!["delete_words".to_string()];
        assert!(allows(Role::Editor, &grants, Action::DeleteWord));
        assert!(!allows(Role::Editor, &grants, Action::ManageUsers));
        assert!(!allows(Role::Editor, &[], Action::DeleteWord));
    }

    #[test]
    fn editors_edit_only_their_own_entries() {
        let me = Uuid::new_v4();
        let someone_else = Uuid::new_v4();
        assert!(can_edit_entry(Role::Editor, me, Some(me)));
        assert!(!can_edit_entry(Role::Editor, me, Some(someone_else)));
        assert!(!can_edit_entry(Role::Editor, me, None));
        assert!(can_edit_entry(Role::Admin, me, Some(someone_else)));
        assert!(can_edit_entry(Role::Superadmin, me, None));
    }

    #[test]
    fn role_ceiling_on_assignment() {
        // Nobody grants above their own role.
        assert!(!can_assign(Role::Admin, Role::User, Role::Superadmin));
        assert!(!can_assign(Role::Editor, Role::User, Role::Admin));
        // Only superadmin grants admin or superadmin.
        assert!(!can_assign(Role::Admin, Role::User, Role::Admin));
        assert!(can_assign(Role::Superadmin, Role::User, Role::Admin));
        assert!(can_assign(Role::Superadmin, Role::User, Role::Superadmin));
        // Admin may grant editor or user.
        assert!(can_assign(Role::Admin, Role::User, Role::Editor));
        assert!(can_assign(Role::Admin, Role::Editor, Role::User));
        // Non-admins grant nothing.
        assert!(!can_assign(Role::Editor, Role::User, Role::User));
        assert!(!can_assign(Role::User, Role::User, Role::User));
    }

    #[test]
    fn demotion_respects_the_targets_current_role() {
        // An admin may not demote a peer admin or a superadmin.
        assert!(!can_assign(Role::Admin, Role::Superadmin, Role::User));
        assert!(!can_assign(Role::Admin, Role::Admin, Role::User));
        // A superadmin may.
        assert!(can_assign(Role::Superadmin, Role::Superadmin, Role::User));
        assert!(can_assign(Role::Superadmin, Role::Admin, Role::Editor));
    }

    #[test]
    fn initial_status_by_author_role() {
        assert_eq!(initial_status(Role::Editor), WordStatus::Pending);
        assert_eq!(initial_status(Role::Admin), WordStatus::Approved);
        assert_eq!(initial_status(Role::Superadmin), WordStatus::Approved);
    }
}
