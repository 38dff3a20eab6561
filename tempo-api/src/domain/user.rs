use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role assigned by the identity provider; drives the access policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Admin,
    Manager,
    ProjectManager,
    Employee,
    #[default]
    Viewer,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub department_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [
            Role::Admin,
            Role::Manager,
            Role::ProjectManager,
            Role::Employee,
            Role::Viewer,
        ] {
            let s = role.to_string();
            assert_eq!(s.parse::<Role>().unwrap(), role);
        }
        assert_eq!("project_manager".parse::<Role>().unwrap(), Role::ProjectManager);
    }

    #[test]
    fn unknown_role_does_not_parse() {
        assert!("superuser".parse::<Role>().is_err());
    }
}
