use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::Specialization;

/// Whether the day was worked or taken as leave.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    #[sea_orm(string_value = "work")]
    Work,
    #[sea_orm(string_value = "leave")]
    Leave,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Work => "work",
            UpdateStatus::Leave => "leave",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(UpdateStatus::Work),
            "leave" => Ok(UpdateStatus::Leave),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// One employee's record for one calendar day.
///
/// `display_name` and `specialization` are copied from the owning account at
/// submission time and kept as an audit trail; they are not refreshed when the
/// account changes later.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_updates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub specialization: Specialization,
    pub date: NaiveDate,
    pub project_type: String,
    pub project_name: String,
    pub work_done: String,
    pub task: Option<String>,
    pub help_taken: Option<String>,
    pub status: UpdateStatus,
    /// Set once on insert; the edit window is measured from here.
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::Username",
        to = "super::account::Column::Username"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
