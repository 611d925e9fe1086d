use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{AttendanceError, Result};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Select, Set,
};

// 列表与分页共用的筛选条件
fn filtered(query: &ClassListQuery) -> Select<Classes> {
    let mut select = Classes::find();

    if let Some(ref search) = query.search
        && !search.trim().is_empty()
    {
        select = select.filter(
            Condition::any()
                .add(Column::ClassCode.like(contains_pattern(search)))
                .add(Column::Name.like(contains_pattern(search))),
        );
    }
    if let Some(course_id) = query.course_id {
        select = select.filter(Column::CourseId.eq(course_id));
    }
    if let Some(instructor_id) = query.instructor_id {
        select = select.filter(Column::InstructorId.eq(instructor_id));
    }
    if let Some(ref year) = query.academic_year {
        select = select.filter(Column::AcademicYear.eq(year.as_str()));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(Column::IsActive.eq(is_active));
    }

    select
        .order_by_desc(Column::AcademicYear)
        .order_by_asc(Column::ClassCode)
}

impl SeaOrmStorage {
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            class_code: Set(req.class_code.trim().to_string()),
            name: Set(req.name.trim().to_string()),
            instructor_id: Set(req.instructor_id),
            academic_year: Set(req.academic_year),
            semester: Set(req.semester),
            start_date: Set(req.start_date.to_string()),
            end_date: Set(req.end_date.to_string()),
            meeting_days: Set(req.meeting_days),
            meeting_time: Set(req.meeting_time),
            venue: Set(req.venue),
            max_students: Set(req.max_students),
            is_active: Set(req.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    pub async fn get_class_by_id_impl(&self, id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn get_class_by_code_impl(&self, class_code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::ClassCode.eq(class_code.trim()))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let paginator = filtered(&query).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级页数失败: {e}")))?;
        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
            items: classes.into_iter().map(|m| m.into_class()).collect(),
        })
    }

    pub async fn list_classes_impl(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        let classes = filtered(&query)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn list_classes_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Class>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let classes = Classes::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("批量查询班级失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn update_class_impl(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(course_id) = update.course_id {
            model.course_id = Set(course_id);
        }
        if let Some(class_code) = update.class_code {
            model.class_code = Set(class_code.trim().to_string());
        }
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(year) = update.academic_year {
            model.academic_year = Set(year);
        }
        if let Some(semester) = update.semester {
            model.semester = Set(semester);
        }
        if let Some(start) = update.start_date {
            model.start_date = Set(start.to_string());
        }
        if let Some(end) = update.end_date {
            model.end_date = Set(end.to_string());
        }
        if let Some(days) = update.meeting_days {
            model.meeting_days = Set(days);
        }
        if let Some(time) = update.meeting_time {
            model.meeting_time = Set(time);
        }
        if let Some(venue) = update.venue {
            model.venue = Set(venue);
        }
        if let Some(max) = update.max_students {
            model.max_students = Set(max);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_class_by_id_impl(id).await
    }

    /// 分配或取消分配任课教师
    pub async fn set_class_instructor_impl(
        &self,
        id: i64,
        instructor_id: Option<i64>,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            instructor_id: Set(instructor_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新任课教师失败: {e}")))?;

        self.get_class_by_id_impl(id).await
    }

    pub async fn delete_class_impl(&self, id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_classes_impl(&self, is_active: Option<bool>) -> Result<u64> {
        let mut select = Classes::find();
        if let Some(active) = is_active {
            select = select.filter(Column::IsActive.eq(active));
        }
        select
            .count(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计班级数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{new_user, seed_class, seed_course, storage};
    use crate::models::classes::requests::ClassListQuery;
    use crate::models::users::entities::{AccountStatus, UserType};

    #[tokio::test]
    async fn test_assign_and_unassign_instructor() {
        let storage = storage().await;
        let instructor = storage
            .create_user_impl(new_user("pwanjiru", UserType::Instructor, AccountStatus::Approved))
            .await
            .unwrap();
        let course = seed_course(&storage, "ELEC").await;
        let class = seed_class(&storage, course.id, "ELEC-2A", None).await;

        let assigned = storage
            .set_class_instructor_impl(class.id, Some(instructor.id))
            .await
            .unwrap()
            .unwrap();
        assert!(assigned.is_taught_by(instructor.id));

        let mine = storage
            .list_classes_impl(ClassListQuery {
                instructor_id: Some(instructor.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);

        let cleared = storage
            .set_class_instructor_impl(class.id, None)
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.instructor_id.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_class_code_rejected() {
        let storage = storage().await;
        let course = seed_course(&storage, "AGRI").await;
        seed_class(&storage, course.id, "AGRI-1", None).await;
        let dup = storage
            .create_class_impl(crate::models::classes::requests::CreateClassRequest {
                course_id: course.id,
                class_code: "AGRI-1".to_string(),
                name: "Again".to_string(),
                instructor_id: None,
                academic_year: "2025/2026".to_string(),
                semester: 1,
                start_date: "2025-09-01".parse().unwrap(),
                end_date: "2025-12-01".parse().unwrap(),
                meeting_days: String::new(),
                meeting_time: String::new(),
                venue: String::new(),
                max_students: 30,
                is_active: true,
            })
            .await
            .unwrap_err();
        assert!(dup.is_unique_violation());
    }
}
