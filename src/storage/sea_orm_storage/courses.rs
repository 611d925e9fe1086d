use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{AttendanceError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code.trim().to_uppercase()),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            level: Set(req.level.to_string()),
            duration_months: Set(req.duration_months),
            department: Set(req.department.trim().to_string()),
            is_active: Set(req.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Code.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Courses::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(Column::Code.like(contains_pattern(search)))
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::Department.like(contains_pattern(search))),
            );
        }

        if let Some(ref level) = query.level {
            select = select.filter(Column::Level.eq(level.to_string()));
        }

        if let Some(ref department) = query.department {
            select = select.filter(Column::Department.eq(department.as_str()));
        }

        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课程总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课程页数失败: {e}")))?;
        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
            items: courses.into_iter().map(|m| m.into_course()).collect(),
        })
    }

    pub async fn list_courses_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let courses = Courses::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("批量查询课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn list_active_courses_impl(&self) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(code) = update.code {
            model.code = Set(code.trim().to_uppercase());
        }
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(level) = update.level {
            model.level = Set(level.to_string());
        }
        if let Some(months) = update.duration_months {
            model.duration_months = Set(months);
        }
        if let Some(department) = update.department {
            model.department = Set(department.trim().to_string());
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_classes_by_course_impl(&self, course_id: i64) -> Result<(u64, u64)> {
        let total = Classes::find()
            .filter(ClassColumn::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计班级数量失败: {e}")))?;

        let active = Classes::find()
            .filter(ClassColumn::CourseId.eq(course_id))
            .filter(ClassColumn::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| AttendanceError::database_operation(format!("统计班级数量失败: {e}")))?;

        Ok((total, active))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{seed_class, seed_course, storage};
    use crate::models::courses::requests::{CourseListQuery, UpdateCourseRequest};

    #[tokio::test]
    async fn test_course_code_is_normalized() {
        let storage = storage().await;
        let course = seed_course(&storage, "eit01").await;
        assert_eq!(course.code, "EIT01");
        assert!(storage.get_course_by_code_impl("eit01").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_course_class_counts() {
        let storage = storage().await;
        let course = seed_course(&storage, "MECH").await;
        seed_class(&storage, course.id, "MECH-1A", None).await;
        seed_class(&storage, course.id, "MECH-1B", None).await;

        assert_eq!(
            storage.count_classes_by_course_impl(course.id).await.unwrap(),
            (2, 2)
        );
    }

    #[tokio::test]
    async fn test_update_and_filter_courses() {
        let storage = storage().await;
        let course = seed_course(&storage, "ICT").await;
        seed_course(&storage, "PLB").await;

        storage
            .update_course_impl(
                course.id,
                UpdateCourseRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let active = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                is_active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.pagination.total, 1);
        assert_eq!(active.items[0].code, "PLB");
    }
}
