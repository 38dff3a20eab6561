use serde::Serialize;

use super::Role;

/// Allowed actions on one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceActions {
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
    pub view_all: bool,
}

impl ResourceActions {
    const fn new(create: bool, edit: bool, delete: bool, view_all: bool) -> Self {
        Self {
            create,
            edit,
            delete,
            view_all,
        }
    }

    const fn all() -> Self {
        Self::new(true, true, true, true)
    }

    const fn none() -> Self {
        Self::new(false, false, false, false)
    }
}

/// The full permission matrix for one role.
///
/// Recomputed per request from the caller's current role; the HTTP layer
/// gates operations with it before anything reaches the store. Ownership
/// scoping inside the store is a separate, always-enforced check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub projects: ResourceActions,
    pub tasks: ResourceActions,
    pub time_entries: ResourceActions,
    pub employees: ResourceActions,
    pub departments: ResourceActions,
    pub organizations: ResourceActions,
    pub manage_users: bool,
    pub create_organizations: bool,
}

pub fn permissions_for(role: Role) -> RolePermissions {
    match role {
        Role::Admin => RolePermissions {
            projects: ResourceActions::all(),
            tasks: ResourceActions::all(),
            time_entries: ResourceActions::all(),
            employees: ResourceActions::all(),
            departments: ResourceActions::all(),
            organizations: ResourceActions::all(),
            manage_users: true,
            create_organizations: true,
        },
        Role::Manager => RolePermissions {
            projects: ResourceActions::all(),
            tasks: ResourceActions::all(),
            time_entries: ResourceActions::all(),
            employees: ResourceActions::new(true, true, false, true),
            departments: ResourceActions::new(false, true, false, true),
            organizations: ResourceActions::new(false, false, false, true),
            manage_users: true,
            create_organizations: false,
        },
        Role::ProjectManager => RolePermissions {
            projects: ResourceActions::new(true, true, false, true),
            tasks: ResourceActions::all(),
            time_entries: ResourceActions::new(true, true, true, true),
            employees: ResourceActions::new(false, false, false, true),
            departments: ResourceActions::none(),
            organizations: ResourceActions::none(),
            manage_users: false,
            create_organizations: false,
        },
        Role::Employee => RolePermissions {
            projects: ResourceActions::none(),
            tasks: ResourceActions::none(),
            time_entries: ResourceActions::new(true, true, true, false),
            employees: ResourceActions::none(),
            departments: ResourceActions::none(),
            organizations: ResourceActions::none(),
            manage_users: false,
            create_organizations: false,
        },
        Role::Viewer => RolePermissions {
            projects: ResourceActions::none(),
            tasks: ResourceActions::none(),
            time_entries: ResourceActions::none(),
            employees: ResourceActions::none(),
            departments: ResourceActions::none(),
            organizations: ResourceActions::none(),
            manage_users: false,
            create_organizations: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_do_everything() {
        let perms = permissions_for(Role::Admin);
        assert_eq!(perms.projects, ResourceActions::all());
        assert_eq!(perms.time_entries, ResourceActions::all());
        assert_eq!(perms.organizations, ResourceActions::all());
        assert!(perms.manage_users);
        assert!(perms.create_organizations);
    }

    #[test]
    fn viewer_can_do_nothing() {
        let perms = permissions_for(Role::Viewer);
        assert_eq!(perms.projects, ResourceActions::none());
        assert_eq!(perms.tasks, ResourceActions::none());
        assert_eq!(perms.time_entries, ResourceActions::none());
        assert!(!perms.manage_users);
        assert!(!perms.create_organizations);
    }

    #[test]
    fn employee_manages_own_entries_only() {
        let perms = permissions_for(Role::Employee);
        assert!(perms.time_entries.create);
        assert!(perms.time_entries.edit);
        assert!(perms.time_entries.delete);
        assert!(!perms.time_entries.view_all);
        assert!(!perms.projects.create);
    }

    #[test]
    fn manager_manages_users_but_not_organizations() {
        let perms = permissions_for(Role::Manager);
        assert!(perms.manage_users);
        assert!(!perms.create_organizations);
        assert!(perms.departments.view_all);
        assert!(perms.time_entries.view_all);
    }

    #[test]
    fn project_manager_cannot_delete_projects() {
        let perms = permissions_for(Role::ProjectManager);
        assert!(perms.projects.create);
        assert!(!perms.projects.delete);
        assert!(perms.tasks.delete);
    }
}
