use super::SeaOrmStorage;
use crate::entity::groups::{
    ActiveModel as GroupActiveModel, Column as GroupColumn, Entity as Groups,
};
use crate::entity::user_groups::{
    ActiveModel as UserGroupActiveModel, Column as UserGroupColumn, Entity as UserGroups,
};
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel};
use crate::errors::{CourseworkError, Result};
use crate::models::users::{
    entities::User,
    requests::{CreateUserRequest, UpdateUserRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

/// 确保用户组存在，返回组 ID
pub(super) async fn ensure_group_on<C: ConnectionTrait>(conn: &C, name: &str) -> Result<i64> {
    let existing = Groups::find()
        .filter(GroupColumn::Name.eq(name))
        .one(conn)
        .await
        .map_err(|e| CourseworkError::database_operation(format!("查询用户组失败: {e}")))?;
    if let Some(group) = existing {
        return Ok(group.id);
    }

    let group = GroupActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| CourseworkError::database_operation(format!("创建用户组失败: {e}")))?;
    Ok(group.id)
}

impl SeaOrmStorage {
    /// 读取用户所在的组名
    async fn load_groups(&self, user_id: i64) -> Result<Vec<String>> {
        let names = Groups::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::groups::Relation::UserGroups.def(),
            )
            .filter(UserGroupColumn::UserId.eq(user_id))
            .order_by_asc(GroupColumn::Name)
            .select_only()
            .column(GroupColumn::Name)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询用户组失败: {e}")))?;
        Ok(names)
    }

    async fn with_groups(&self, model: Option<UserModel>) -> Result<Option<User>> {
        match model {
            Some(m) => {
                let groups = self.load_groups(m.id).await?;
                Ok(Some(m.into_user(groups)))
            }
            None => Ok(None),
        }
    }

    /// 创建用户并加入用户组
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseworkError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            display_name: Set(req.display_name),
            is_staff: Set(req.is_staff),
            is_superuser: Set(req.is_superuser),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = model
            .insert(&txn)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("创建用户失败: {e}")))?;

        let mut groups = req.groups;
        groups.sort();
        groups.dedup();
        for name in &groups {
            let group_id = ensure_group_on(&txn, name).await?;
            UserGroupActiveModel {
                user_id: Set(user.id),
                group_id: Set(group_id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("加入用户组失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| CourseworkError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(user.into_user(groups))
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询用户失败: {e}")))?;

        self.with_groups(result).await
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询用户失败: {e}")))?;

        self.with_groups(result).await
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询用户失败: {e}")))?;

        self.with_groups(result).await
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CourseworkError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询用户失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(display_name) = update.display_name {
            let trimmed = display_name.trim();
            model.display_name = Set((!trimmed.is_empty()).then(|| trimmed.to_string()));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 组内成员 ID（升序）
    pub async fn list_group_member_ids_impl(&self, name: &str) -> Result<Vec<i64>> {
        let ids = UserGroups::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::user_groups::Relation::Group.def(),
            )
            .filter(GroupColumn::Name.eq(name))
            .order_by_asc(UserGroupColumn::UserId)
            .select_only()
            .column(UserGroupColumn::UserId)
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("查询组成员失败: {e}")))?;
        Ok(ids)
    }

    /// 组内成员数量
    pub async fn count_group_members_impl(&self, name: &str) -> Result<u64> {
        let count = UserGroups::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::user_groups::Relation::Group.def(),
            )
            .filter(GroupColumn::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(|e| CourseworkError::database_operation(format!("统计组成员失败: {e}")))?;
        Ok(count)
    }
}
