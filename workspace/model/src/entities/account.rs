use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What an account is allowed to do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "employee")]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// The work category an employee declares at first login.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Specialization {
    #[sea_orm(string_value = "software")]
    Software,
    #[sea_orm(string_value = "hardware")]
    Hardware,
}

impl Specialization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::Software => "software",
            Specialization::Hardware => "hardware",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "software" => Ok(Specialization::Software),
            "hardware" => Ok(Specialization::Hardware),
            _ => Err(format!("Invalid specialization: {}", s)),
        }
    }
}

/// A person who can log in.
///
/// Accounts are created on the first login with an unknown username, or
/// seeded from the CLI. They are never deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Human readable name, copied onto every work update.
    pub display_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    /// Unset only for an employee that has not picked one yet.
    pub specialization: Option<Specialization>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_update::Entity")]
    WorkUpdate,
}

impl Related<super::work_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkUpdate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// An employee without a specialization still has to pick one.
    pub fn requires_specialization_selection(&self) -> bool {
        self.role == Role::Employee && self.specialization.is_none()
    }
}

/// Derives a display name from a username by upper-casing the first letter.
pub fn display_name_from_username(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_from_username() {
        assert_eq!(display_name_from_username("bob"), "Bob");
        assert_eq!(display_name_from_username("Alice"), "Alice");
        assert_eq!(display_name_from_username("élodie"), "Élodie");
        assert_eq!(display_name_from_username(""), "");
    }

    #[test]
    fn test_enum_parsing_is_exact() {
        assert_eq!("software".parse::<Specialization>(), Ok(Specialization::Software));
        assert_eq!("hardware".parse::<Specialization>(), Ok(Specialization::Hardware));
        assert!("Software".parse::<Specialization>().is_err());
        assert!("firmware".parse::<Specialization>().is_err());
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_requires_specialization_selection() {
        let mut account = Model {
            id: 1,
            username: "bob".to_string(),
            display_name: "Bob".to_string(),
            password_hash: String::new(),
            role: Role::Employee,
            specialization: None,
        };
        assert!(account.requires_specialization_selection());

        account.specialization = Some(Specialization::Hardware);
        assert!(!account.requires_specialization_selection());

        account.specialization = None;
        account.role = Role::Admin;
        assert!(!account.requires_specialization_selection());
    }
}
