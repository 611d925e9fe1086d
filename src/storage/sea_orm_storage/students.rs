use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{AttendanceError, Result};
use crate::models::{
    PaginationInfo,
    reports::responses::StudentStatsData,
    students::{
        entities::{Gender, Student, StudentStatus, admission_sequence},
        requests::{NewStudent, StudentListQuery, UpdateStudentRequest},
        responses::{StudentListItem, StudentListResponse},
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建学生档案（登录账号需已存在）
    pub async fn create_student_impl(&self, student: NewStudent) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();
        let profile = student.profile;

        let model = ActiveModel {
            user_id: Set(student.user_id),
            admission_number: Set(student.admission_number),
            national_id: Set(profile.national_id.filter(|n| !n.trim().is_empty())),
            date_of_birth: Set(profile.date_of_birth.to_string()),
            gender: Set(profile.gender.to_string()),
            address: Set(profile.address),
            county: Set(student.county),
            sub_county: Set(profile.sub_county),
            ward: Set(profile.ward),
            phone_number_alternative: Set(profile.phone_number_alternative),
            emergency_contact_name: Set(profile.emergency_contact_name),
            emergency_contact_phone: Set(profile.emergency_contact_phone),
            emergency_contact_relationship: Set(profile.emergency_contact_relationship),
            year_of_admission: Set(profile.year_of_admission),
            current_class_id: Set(profile.current_class_id),
            course_id: Set(profile.course_id),
            status: Set(StudentStatus::Active.to_string()),
            is_boarding: Set(profile.is_boarding),
            has_special_needs: Set(profile.has_special_needs),
            special_needs_description: Set(profile.special_needs_description),
            parent_name: Set(profile.parent_name),
            parent_phone: Set(profile.parent_phone),
            parent_email: Set(profile.parent_email),
            parent_occupation: Set(profile.parent_occupation),
            last_attendance_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建学生档案失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_admission_number_impl(
        &self,
        number: &str,
    ) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::AdmissionNumber.eq(number.trim()))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 当年已用的最大学号序号，忽略手工录入的非数字序号
    pub async fn max_admission_sequence_impl(&self, year_prefix: &str) -> Result<Option<u32>> {
        let numbers: Vec<String> = Students::find()
            .select_only()
            .column(Column::AdmissionNumber)
            .filter(Column::AdmissionNumber.starts_with(year_prefix))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学号失败: {e}")))?;

        Ok(numbers
            .iter()
            .filter_map(|n| admission_sequence(year_prefix, n))
            .max())
    }

    /// 分页列出学生，附带账号信息
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Students::find().inner_join(Users);

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::AdmissionNumber.like(contains_pattern(search)))
                    .add(Column::NationalId.like(contains_pattern(search)))
                    .add(UserColumn::FirstName.like(contains_pattern(search)))
                    .add(UserColumn::LastName.like(contains_pattern(search))),
            );
        }

        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        // 班级筛选：该班级的在读选课
        if let Some(class_id) = query.class_id {
            let student_ids: Vec<i64> = Enrollments::find()
                .select_only()
                .column(EnrollmentColumn::StudentId)
                .filter(EnrollmentColumn::ClassId.eq(class_id))
                .filter(EnrollmentColumn::IsActive.eq(true))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| AttendanceError::database_operation(format!("查询选课失败: {e}")))?;
            select = select.filter(Column::Id.is_in(student_ids));
        }

        let paginator = select
            .order_by_asc(Column::AdmissionNumber)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生页数失败: {e}")))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生列表失败: {e}")))?;

        let user_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
        let users: HashMap<i64, _> = self
            .list_users_by_ids_impl(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let items = students
            .into_iter()
            .map(|m| {
                let student = m.into_student();
                let (full_name, email, username) = users
                    .get(&student.user_id)
                    .map(|u| (u.full_name(), u.email.clone(), u.username.clone()))
                    .unwrap_or_default();
                StudentListItem {
                    student,
                    full_name,
                    email,
                    username,
                }
            })
            .collect();

        Ok(StudentListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn list_students_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Student>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let students = Students::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::AdmissionNumber)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("批量查询学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn list_students_impl(&self, status: Option<StudentStatus>) -> Result<Vec<Student>> {
        let mut select = Students::find();
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        let students = select
            .order_by_asc(Column::AdmissionNumber)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 更新档案字段；账号字段（姓名、邮箱、电话）由调用方写入 users 表
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(national_id) = update.national_id {
            let trimmed = national_id.trim().to_string();
            model.national_id = Set((!trimmed.is_empty()).then_some(trimmed));
        }
        if let Some(dob) = update.date_of_birth {
            model.date_of_birth = Set(dob.to_string());
        }
        if let Some(gender) = update.gender {
            model.gender = Set(gender.to_string());
        }
        if let Some(v) = update.address {
            model.address = Set(v);
        }
        if let Some(v) = update.county {
            model.county = Set(v);
        }
        if let Some(v) = update.sub_county {
            model.sub_county = Set(v);
        }
        if let Some(v) = update.ward {
            model.ward = Set(v);
        }
        if let Some(v) = update.phone_number_alternative {
            model.phone_number_alternative = Set(v);
        }
        if let Some(v) = update.emergency_contact_name {
            model.emergency_contact_name = Set(v);
        }
        if let Some(v) = update.emergency_contact_phone {
            model.emergency_contact_phone = Set(v);
        }
        if let Some(v) = update.emergency_contact_relationship {
            model.emergency_contact_relationship = Set(v);
        }
        if let Some(v) = update.year_of_admission {
            model.year_of_admission = Set(v);
        }
        if let Some(v) = update.current_class_id {
            model.current_class_id = Set(Some(v));
        }
        if let Some(v) = update.course_id {
            model.course_id = Set(Some(v));
        }
        if let Some(v) = update.status {
            model.status = Set(v.to_string());
        }
        if let Some(v) = update.is_boarding {
            model.is_boarding = Set(v);
        }
        if let Some(v) = update.has_special_needs {
            model.has_special_needs = Set(v);
        }
        if let Some(v) = update.special_needs_description {
            model.special_needs_description = Set(v);
        }
        if let Some(v) = update.parent_name {
            model.parent_name = Set(v);
        }
        if let Some(v) = update.parent_phone {
            model.parent_phone = Set(v);
        }
        if let Some(v) = update.parent_email {
            model.parent_email = Set(v);
        }
        if let Some(v) = update.parent_occupation {
            model.parent_occupation = Set(v);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新学生档案失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    pub async fn set_student_status_impl(
        &self,
        id: i64,
        status: StudentStatus,
    ) -> Result<Option<Student>> {
        self.update_student_impl(
            id,
            UpdateStudentRequest {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn update_last_attendance_date_impl(
        &self,
        id: i64,
        date: chrono::NaiveDate,
    ) -> Result<bool> {
        let result = Students::update_many()
            .col_expr(
                Column::LastAttendanceDate,
                sea_orm::sea_query::Expr::value(date.to_string()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AttendanceError::database_operation(format!("更新最后出勤日期失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn student_stats_impl(&self) -> Result<StudentStatsData> {
        let rows: Vec<(String, String, i64)> = Students::find()
            .select_only()
            .column(Column::Status)
            .column(Column::Gender)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Status)
            .group_by(Column::Gender)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计学生失败: {e}")))?;

        let active_key = StudentStatus::Active.to_string();
        let male_key = Gender::Male.to_string();
        let female_key = Gender::Female.to_string();

        let mut stats = StudentStatsData::default();
        for (status, gender, count) in rows {
            let count = count as u64;
            stats.total += count;
            if status == active_key {
                stats.active += count;
            }
            if gender == male_key {
                stats.male += count;
            } else if gender == female_key {
                stats.female += count;
            }
        }
        stats.inactive = stats.total - stats.active;

        Ok(stats)
    }

    pub async fn count_active_students_by_course_impl(&self) -> Result<HashMap<i64, u64>> {
        let rows: Vec<(Option<i64>, i64)> = Students::find()
            .select_only()
            .column(Column::CourseId)
            .column_as(Column::Id.count(), "count")
            .filter(Column::Status.eq(StudentStatus::Active.to_string()))
            .filter(Column::CourseId.is_not_null())
            .group_by(Column::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计课程学生数失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(course_id, count)| course_id.map(|id| (id, count as u64)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{seed_student, storage};
    use crate::models::students::entities::{StudentStatus, next_admission_number};
    use crate::models::students::requests::{StudentListQuery, UpdateStudentRequest};

    #[tokio::test]
    async fn test_max_admission_sequence_uses_prefix() {
        let storage = storage().await;
        seed_student(&storage, "s1", "TVET20250001").await;
        seed_student(&storage, "s2", "TVET20250007").await;
        seed_student(&storage, "s3", "TVET20240099").await;

        assert_eq!(
            storage.max_admission_sequence_impl("TVET2025").await.unwrap(),
            Some(7)
        );
        assert!(
            storage
                .max_admission_sequence_impl("TVET2026")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_manual_number_does_not_shadow_sequence() {
        let storage = storage().await;
        seed_student(&storage, "s1", "TVET20250001").await;
        seed_student(&storage, "s2", "TVET20250002").await;
        seed_student(&storage, "s3", "TVET2025A01").await;

        let last = storage.max_admission_sequence_impl("TVET2025").await.unwrap();
        assert_eq!(last, Some(2));
        assert_eq!(
            next_admission_number("TVET", 2025, last),
            "TVET20250003"
        );
    }

    #[tokio::test]
    async fn test_student_list_search_and_status_filter() {
        let storage = storage().await;
        let first = seed_student(&storage, "mwende", "TVET20250001").await;
        seed_student(&storage, "baraka", "TVET20250002").await;

        storage
            .set_student_status_impl(first.id, StudentStatus::Inactive)
            .await
            .unwrap();

        let found = storage
            .list_students_with_pagination_impl(StudentListQuery {
                search: Some("mwen".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.pagination.total, 1);
        assert_eq!(found.items[0].username, "mwende");

        let active = storage
            .list_students_with_pagination_impl(StudentListQuery {
                status: Some(StudentStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.items.len(), 1);
        assert_eq!(active.items[0].student.admission_number, "TVET20250002");
    }

    #[tokio::test]
    async fn test_student_stats_counts_gender_and_status() {
        let storage = storage().await;
        let a = seed_student(&storage, "a1", "TVET20250001").await;
        seed_student(&storage, "a2", "TVET20250002").await;
        storage
            .update_student_impl(
                a.id,
                UpdateStudentRequest {
                    gender: Some(crate::models::students::entities::Gender::Male),
                    status: Some(StudentStatus::Graduated),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stats = storage.student_stats_impl().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.male, 1);
        assert_eq!(stats.female, 1);
    }

    #[tokio::test]
    async fn test_deleting_user_removes_profile() {
        let storage = storage().await;
        let student = seed_student(&storage, "gone", "TVET20250003").await;
        assert!(storage.delete_user_impl(student.user_id).await.unwrap());
        assert!(
            storage
                .get_student_by_id_impl(student.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
