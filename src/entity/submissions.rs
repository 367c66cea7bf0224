//! 提交实体
//!
//! 分数范围 [0, 100] 在保存钩子中校验，任何经由 ActiveModel 的写入都会被检查。

use sea_orm::ActiveValue;
use sea_orm::entity::prelude::*;

use crate::models::submissions::entities::validate_score;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub author_id: i64,
    pub grader_id: Option<i64>,
    #[sea_orm(unique)]
    pub file: String,
    pub original_name: String,
    pub file_size: i64,
    pub score: Option<f64>,
    pub submitted_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id",
        on_delete = "Cascade"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::GraderId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Grader,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

// 默认关联到作者；批改人通过 Relation::Grader 显式 join
impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(Some(score)) | ActiveValue::Unchanged(Some(score)) = &self.score {
            validate_score(*score).map_err(DbErr::Custom)?;
        }
        Ok(self)
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::Submission;
        use chrono::{DateTime, Utc};

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            author_id: self.author_id,
            grader_id: self.grader_id,
            file: self.file,
            original_name: self.original_name,
            file_size: self.file_size,
            score: self.score,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
