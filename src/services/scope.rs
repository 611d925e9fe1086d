//! 按当前用户类型划定可见数据范围

use std::sync::Arc;

use actix_web::HttpResponse;

use super::internal_error;
use crate::models::students::entities::Student;
use crate::models::users::entities::{User, UserType};
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub(crate) enum Scope {
    /// 管理员、教务员、系主任
    All,
    /// 任课教师，只看自己任教的班级
    Instructor(i64),
    /// 学生，只看有效选课的班级；没有学籍档案时为 None
    Student {
        student: Option<Student>,
        class_ids: Vec<i64>,
    },
}

impl Scope {
    pub(crate) fn instructor_id(&self) -> Option<i64> {
        match self {
            Scope::Instructor(id) => Some(*id),
            _ => None,
        }
    }

    pub(crate) fn class_ids(&self) -> Option<Vec<i64>> {
        match self {
            Scope::Student { class_ids, .. } => Some(class_ids.clone()),
            _ => None,
        }
    }

    pub(crate) fn student_id(&self) -> Option<i64> {
        match self {
            Scope::Student { student, .. } => student.as_ref().map(|s| s.id),
            _ => None,
        }
    }
}

pub(crate) async fn resolve_scope(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Scope, HttpResponse> {
    match user.user_type {
        UserType::Instructor => Ok(Scope::Instructor(user.id)),
        UserType::Student => {
            let student = storage
                .get_student_by_user_id(user.id)
                .await
                .map_err(|e| internal_error("Failed to load student profile", e))?;
            let class_ids = match &student {
                Some(student) => storage
                    .list_enrollments_by_student(student.id, true)
                    .await
                    .map_err(|e| internal_error("Failed to load enrollments", e))?
                    .into_iter()
                    .map(|e| e.class_id)
                    .collect(),
                None => Vec::new(),
            };
            Ok(Scope::Student { student, class_ids })
        }
        _ => Ok(Scope::All),
    }
}
