//! 提交存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CourseworkError, Result};
use crate::models::submissions::{
    entities::{NewSubmission, Submission, validate_score},
    responses::SubmissionListItem,
};
use crate::storage::SubmissionCountQuery;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            author_id: Set(req.author_id),
            grader_id: Set(req.grader_id),
            file: Set(req.file),
            original_name: Set(req.original_name),
            file_size: Set(req.file_size),
            score: Set(None),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 通过存储文件名获取提交
    pub async fn get_submission_by_file_impl(&self, file: &str) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::File.eq(file))
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 某学生在某作业下最早的提交
    pub async fn find_submission_impl(
        &self,
        assignment_id: i64,
        author_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::AuthorId.eq(author_id))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 作业下的提交列表，按作者用户名排序
    pub async fn list_submissions_for_assignment_impl(
        &self,
        assignment_id: i64,
        grader_id: Option<i64>,
    ) -> Result<Vec<SubmissionListItem>> {
        let mut select = Submissions::find()
            .find_also_related(Users)
            .filter(Column::AssignmentId.eq(assignment_id));

        if let Some(grader_id) = grader_id {
            select = select.filter(Column::GraderId.eq(grader_id));
        }

        let rows = select
            .order_by_asc(UserColumn::Username)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(submission, author)| {
                let (author_username, author_display_name) = author
                    .map(|a| (a.username, a.display_name))
                    .unwrap_or_default();
                SubmissionListItem {
                    id: submission.id,
                    author_id: submission.author_id,
                    author_username,
                    author_display_name,
                    grader_id: submission.grader_id,
                    file: submission.file,
                    original_name: submission.original_name,
                    is_graded: submission.score.is_some(),
                    score: submission.score,
                    submitted_at: chrono::DateTime::<chrono::Utc>::from_timestamp(
                        submission.submitted_at,
                        0,
                    )
                    .unwrap_or_default(),
                }
            })
            .collect())
    }

    /// 某学生的全部提交
    pub async fn list_author_submissions_impl(&self, author_id: i64) -> Result<Vec<Submission>> {
        let models = Submissions::find()
            .filter(Column::AuthorId.eq(author_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 按条件计数
    pub async fn count_submissions_impl(&self, query: SubmissionCountQuery) -> Result<u64> {
        let mut select = Submissions::find();

        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(grader_id) = query.grader_id {
            select = select.filter(Column::GraderId.eq(grader_id));
        }
        match query.graded {
            Some(true) => select = select.filter(Column::Score.is_not_null()),
            Some(false) => select = select.filter(Column::Score.is_null()),
            None => {}
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("统计提交数量失败: {e}")))?;

        Ok(count)
    }

    /// 各批改人在该作业下的提交数
    pub async fn grader_load_impl(&self, assignment_id: i64) -> Result<HashMap<i64, u64>> {
        let rows = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::GraderId.is_not_null())
            .select_only()
            .column(Column::GraderId)
            .column_as(Column::Id.count(), "load")
            .group_by(Column::GraderId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("统计批改负载失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(grader_id, load)| (grader_id, load.max(0) as u64))
            .collect())
    }

    /// 设置或清除分数
    pub async fn set_submission_score_impl(
        &self,
        id: i64,
        score: Option<f64>,
    ) -> Result<Option<Submission>> {
        if let Some(score) = score {
            validate_score(score).map_err(CourseworkError::score_out_of_range)?;
        }

        let existing = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询提交失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            score: Set(score),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("更新分数失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    fn raw_submission(score: f64) -> ActiveModel {
        ActiveModel {
            assignment_id: Set(1),
            author_id: Set(1),
            grader_id: Set(None),
            file: Set(format!("raw-{score}.pdf")),
            original_name: Set("raw.pdf".to_string()),
            file_size: Set(4),
            score: Set(Some(score)),
            submitted_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_hook_rejects_out_of_range_score() {
        let storage = SeaOrmStorage::connect(":memory:", 1, 5).await.unwrap();

        for score in [150.0, -0.5] {
            let err = raw_submission(score).insert(&storage.db).await.unwrap_err();
            match err {
                DbErr::Custom(msg) => assert!(msg.contains("out of range"), "{msg}"),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(Submissions::find().count(&storage.db).await.unwrap(), 0);
    }
}
