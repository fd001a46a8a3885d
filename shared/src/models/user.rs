//! Admin user value types

use serde::{Deserialize, Serialize};

/// Back-office role (RBAC 角色)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Manager,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// `admin` and `super_admin` hold every permission
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status; only `active` accounts may log in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    #[default]
    Pending,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        assert_eq!("manager".parse::<UserRole>(), Ok(UserRole::Manager));
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_ordering() {
        assert!(UserRole::SuperAdmin > UserRole::Admin);
        assert!(UserRole::Admin > UserRole::Manager);
        assert!(UserRole::Manager > UserRole::User);
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Manager.is_admin());
    }

    #[test]
    fn test_status_default() {
        assert_eq!(UserStatus::default(), UserStatus::Pending);
        assert_eq!(UserStatus::Inactive.as_str(), "inactive");
    }
}
