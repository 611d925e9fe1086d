use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{AttendanceError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{AccountStatus, AccountStatusChange, User, UserType},
        requests::{NewUser, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let approved_at = if user.account_status == AccountStatus::Approved {
            Some(now)
        } else {
            None
        };

        let model = ActiveModel {
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            user_type: Set(user.user_type.to_string()),
            phone_number: Set(user.phone_number),
            department: Set(user.department),
            account_status: Set(user.account_status.to_string()),
            is_active: Set(user.is_active),
            approved_by: Set(user.approved_by),
            approved_at: Set(approved_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Users::find();

        // 搜索用户名、邮箱、姓名
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search)))
                    .add(Column::FirstName.like(contains_pattern(search)))
                    .add(Column::LastName.like(contains_pattern(search))),
            );
        }

        if let Some(ref user_type) = query.user_type {
            select = select.filter(Column::UserType.eq(user_type.to_string()));
        }

        if let Some(ref status) = query.account_status {
            select = select.filter(Column::AccountStatus.eq(status.to_string()));
        }

        // 待审核列表只包含需要审核的教职工类型
        if query.pending_staff_only {
            let staff: Vec<String> = UserType::staff_roles()
                .iter()
                .map(|t| t.to_string())
                .collect();
            select = select
                .filter(Column::AccountStatus.eq(AccountStatus::Pending.to_string()))
                .filter(Column::UserType.is_in(staff));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn list_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = Users::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 教师列表，按姓名排序
    pub async fn list_instructors_impl(&self, active_only: bool) -> Result<Vec<User>> {
        let mut select = Users::find().filter(Column::UserType.eq(UserType::INSTRUCTOR));
        if active_only {
            select = select
                .filter(Column::IsActive.eq(true))
                .filter(Column::AccountStatus.eq(AccountStatus::Approved.to_string()));
        }

        let users = select
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::LastName)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AttendanceError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息（password 字段应为哈希值）
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password {
            model.password_hash = Set(password_hash);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(user_type) = update.user_type {
            model.user_type = Set(user_type.to_string());
        }
        if let Some(phone_number) = update.phone_number {
            model.phone_number = Set(Some(phone_number));
        }
        if let Some(department) = update.department {
            model.department = Set(Some(department));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 写入审核结果
    pub async fn set_account_status_impl(
        &self,
        id: i64,
        change: AccountStatusChange,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            account_status: Set(change.account_status.to_string()),
            is_active: Set(change.is_active),
            approved_by: Set(change.approved_by),
            approved_at: Set(change.approved_at),
            rejection_reason: Set(change.rejection_reason),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新账号状态失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计用户数量失败: {e}")))
    }

    pub async fn count_users_by_type_impl(
        &self,
        user_type: UserType,
        is_active: Option<bool>,
    ) -> Result<u64> {
        let mut select = Users::find().filter(Column::UserType.eq(user_type.to_string()));
        if let Some(active) = is_active {
            select = select.filter(Column::IsActive.eq(active));
        }
        select
            .count(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计用户数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{new_user, storage};
    use crate::models::users::entities::{AccountStatus, AccountStatusChange, UserType};
    use crate::models::users::requests::{UpdateUserRequest, UserListQuery};

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = storage().await;
        let user = storage
            .create_user_impl(new_user("wmutua", UserType::Instructor, AccountStatus::Pending))
            .await
            .unwrap();

        assert!(user.approved_at.is_none());
        let by_email = storage
            .get_user_by_username_or_email_impl("wmutua@kitui-tvet.ac.ke")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let storage = storage().await;
        storage
            .create_user_impl(new_user("akamau", UserType::Student, AccountStatus::Approved))
            .await
            .unwrap();
        let err = storage
            .create_user_impl(new_user("akamau", UserType::Student, AccountStatus::Approved))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_email_change_to_taken_address_is_unique_violation() {
        let storage = storage().await;
        storage
            .create_user_impl(new_user("nmuthoni", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let other = storage
            .create_user_impl(new_user("jowino", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();

        let err = storage
            .update_user_impl(
                other.id,
                UpdateUserRequest {
                    email: Some("nmuthoni@kitui-tvet.ac.ke".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_pending_staff_listing_and_approval() {
        let storage = storage().await;
        let admin = storage
            .create_user_impl(new_user("admin1", UserType::Admin, AccountStatus::Approved))
            .await
            .unwrap();
        let pending = storage
            .create_user_impl(new_user("hod01", UserType::Hod, AccountStatus::Pending))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("stud01", UserType::Student, AccountStatus::Pending))
            .await
            .unwrap();

        let list = storage
            .list_users_with_pagination_impl(UserListQuery {
                pending_staff_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, pending.id);

        let approved = storage
            .set_account_status_impl(pending.id, AccountStatusChange::approve(admin.id, 1_700_000_000))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(approved.account_status, AccountStatus::Approved);
        assert!(approved.is_active);
        assert_eq!(approved.approved_by, Some(admin.id));
    }

    #[tokio::test]
    async fn test_search_treats_underscore_literally() {
        let storage = storage().await;
        storage
            .create_user_impl(new_user("j_otieno", UserType::Student, AccountStatus::Approved))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("jxotieno", UserType::Student, AccountStatus::Approved))
            .await
            .unwrap();

        let list = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("j_o".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
        assert_eq!(list.items[0].username, "j_otieno");
    }
}
