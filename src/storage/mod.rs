use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{
            AttendanceRecord, AttendanceSession, AttendanceSummary, PeriodType, SessionStatus,
        },
        requests::{NewSession, RecordFilter, RecordWrite, SessionListQuery, SummaryWrite},
        responses::{RecordDetail, SessionListResponse, StatusCounts},
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    excuses::{
        entities::{ExcuseApplication, ExcuseStatus},
        requests::{ExcuseListQuery, NewExcuse},
        responses::{ExcuseDetail, ExcuseListResponse, ReviewExcuseResponse},
    },
    reports::{
        entities::{DashboardWidget, GeneratedReport, ReportSchedule, ReportTemplate},
        requests::{
            CreateScheduleRequest, CreateTemplateRequest, CreateWidgetRequest, SaveReportRequest,
            SavedReportListQuery, UpdateScheduleRequest, UpdateTemplateRequest,
            UpdateWidgetRequest,
        },
        responses::{SavedReportListResponse, StudentStatsData},
    },
    students::{
        entities::{AcademicRecord, Enrollment, Student, StudentStatus},
        requests::{
            CreateAcademicRecordRequest, NewEnrollment, NewStudent, StudentListQuery,
            UpdateStudentRequest,
        },
        responses::StudentListResponse,
    },
    users::{
        entities::{AccountStatusChange, User, UserType},
        requests::{NewUser, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（密码已哈希）
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 登录时用户名或邮箱均可
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 教师列表（用于分配教师下拉框）
    async fn list_instructors(&self, active_only: bool) -> Result<Vec<User>>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 审核、拒绝、停用
    async fn set_account_status(
        &self,
        id: i64,
        change: AccountStatusChange,
    ) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;
    async fn count_users_by_type(
        &self,
        user_type: UserType,
        is_active: Option<bool>,
    ) -> Result<u64>;

    /// 课程管理方法
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn list_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>>;
    async fn list_active_courses(&self) -> Result<Vec<Course>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;
    // 课程下的班级数：(全部, 启用)
    async fn count_classes_by_course(&self, course_id: i64) -> Result<(u64, u64)>;

    /// 班级管理方法
    async fn create_class(&self, req: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>>;
    async fn get_class_by_code(&self, class_code: &str) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(&self, query: ClassListQuery)
    -> Result<ClassListResponse>;
    // 不分页，忽略 page/size
    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>>;
    async fn list_classes_by_ids(&self, ids: &[i64]) -> Result<Vec<Class>>;
    async fn update_class(&self, id: i64, update: UpdateClassRequest) -> Result<Option<Class>>;
    async fn set_class_instructor(
        &self,
        id: i64,
        instructor_id: Option<i64>,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, id: i64) -> Result<bool>;
    async fn count_classes(&self, is_active: Option<bool>) -> Result<u64>;

    /// 学生档案方法
    async fn create_student(&self, student: NewStudent) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_admission_number(&self, number: &str) -> Result<Option<Student>>;
    // 当年学号中最大的数字序号
    async fn max_admission_sequence(&self, year_prefix: &str) -> Result<Option<u32>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>>;
    async fn list_students(&self, status: Option<StudentStatus>) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn set_student_status(&self, id: i64, status: StudentStatus)
    -> Result<Option<Student>>;
    async fn update_last_attendance_date(&self, id: i64, date: chrono::NaiveDate)
    -> Result<bool>;
    async fn student_stats(&self) -> Result<StudentStatsData>;
    // 各课程的在读学生数
    async fn count_active_students_by_course(&self) -> Result<HashMap<i64, u64>>;

    /// 选课方法
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment>;
    async fn get_enrollment(&self, student_id: i64, class_id: i64) -> Result<Option<Enrollment>>;
    async fn set_enrollment_active(&self, id: i64, is_active: bool)
    -> Result<Option<Enrollment>>;
    async fn list_enrollments_by_student(
        &self,
        student_id: i64,
        active_only: bool,
    ) -> Result<Vec<Enrollment>>;
    async fn list_enrollments_by_class(
        &self,
        class_id: i64,
        active_only: bool,
    ) -> Result<Vec<Enrollment>>;
    async fn count_active_enrollments(&self, class_id: i64) -> Result<u64>;

    /// 成绩方法
    async fn create_academic_record(
        &self,
        student_id: i64,
        req: CreateAcademicRecordRequest,
    ) -> Result<AcademicRecord>;
    async fn list_academic_records(&self, student_id: i64) -> Result<Vec<AcademicRecord>>;

    /// 考勤课次方法
    async fn create_session(&self, session: NewSession) -> Result<AttendanceSession>;
    async fn get_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>>;
    // 同一班级、日期、开始时间只能有一个课次
    async fn find_session_slot(
        &self,
        class_id: i64,
        session_date: chrono::NaiveDate,
        start_time: chrono::NaiveTime,
    ) -> Result<Option<AttendanceSession>>;
    async fn list_sessions_with_pagination(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse>;
    async fn list_sessions(
        &self,
        query: SessionListQuery,
        limit: Option<u64>,
    ) -> Result<Vec<AttendanceSession>>;
    async fn count_sessions(&self, query: SessionListQuery) -> Result<u64>;
    // 状态迁移，completed 时写入 closed_at
    async fn update_session_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<Option<AttendanceSession>>;
    async fn update_session_qr(
        &self,
        id: i64,
        qr_code_data: &str,
        qr_code_expiry: i64,
    ) -> Result<Option<AttendanceSession>>;
    // 按记录重新统计出勤、缺勤、迟到人数
    async fn refresh_session_totals(&self, id: i64) -> Result<Option<AttendanceSession>>;

    /// 考勤记录方法
    // 批量创建缺勤记录，已有记录的学生跳过
    async fn create_absent_records(
        &self,
        session_id: i64,
        student_ids: &[i64],
        marked_by: i64,
    ) -> Result<u64>;
    async fn get_record_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>>;
    async fn get_record(&self, session_id: i64, student_id: i64)
    -> Result<Option<AttendanceRecord>>;
    // 不存在则创建
    async fn save_record(&self, write: RecordWrite) -> Result<AttendanceRecord>;
    async fn list_record_details(&self, filter: RecordFilter) -> Result<Vec<RecordDetail>>;
    async fn list_record_details_page(
        &self,
        filter: RecordFilter,
        page: i64,
        size: i64,
    ) -> Result<(Vec<RecordDetail>, PaginationInfo)>;
    async fn count_records_by_status(&self, filter: RecordFilter) -> Result<StatusCounts>;

    /// 周期汇总方法
    async fn save_summary(&self, summary: SummaryWrite) -> Result<AttendanceSummary>;
    async fn get_summary(
        &self,
        student_id: i64,
        class_id: i64,
        period_type: PeriodType,
        period_start: chrono::NaiveDate,
    ) -> Result<Option<AttendanceSummary>>;
    async fn list_summaries(
        &self,
        student_id: Option<i64>,
        class_id: Option<i64>,
    ) -> Result<Vec<AttendanceSummary>>;

    /// 请假申请方法
    async fn create_excuse(&self, excuse: NewExcuse) -> Result<ExcuseApplication>;
    async fn get_excuse_by_id(&self, id: i64) -> Result<Option<ExcuseApplication>>;
    async fn get_excuse_detail(&self, id: i64) -> Result<Option<ExcuseDetail>>;
    async fn list_excuses_with_pagination(
        &self,
        query: ExcuseListQuery,
    ) -> Result<ExcuseListResponse>;
    // 在同一事务内写入审核结果；批准时同时标记考勤记录
    async fn review_excuse(
        &self,
        id: i64,
        status: ExcuseStatus,
        reviewer_id: i64,
        review_notes: String,
    ) -> Result<Option<ReviewExcuseResponse>>;
    // 仅处理待审核申请；已审核或不存在时返回 None
    async fn cancel_excuse(&self, id: i64) -> Result<Option<ExcuseApplication>>;

    /// 报表模板方法
    async fn create_report_template(
        &self,
        req: CreateTemplateRequest,
        created_by: i64,
    ) -> Result<ReportTemplate>;
    async fn get_report_template(&self, id: i64) -> Result<Option<ReportTemplate>>;
    async fn list_report_templates(&self, active_only: bool) -> Result<Vec<ReportTemplate>>;
    async fn update_report_template(
        &self,
        id: i64,
        update: UpdateTemplateRequest,
    ) -> Result<Option<ReportTemplate>>;
    async fn delete_report_template(&self, id: i64) -> Result<bool>;

    /// 已保存报表方法
    async fn save_generated_report(
        &self,
        req: SaveReportRequest,
        generated_by: i64,
    ) -> Result<GeneratedReport>;
    async fn get_generated_report(&self, id: i64) -> Result<Option<GeneratedReport>>;
    async fn list_generated_reports(
        &self,
        query: SavedReportListQuery,
    ) -> Result<SavedReportListResponse>;
    async fn list_recent_reports(&self, generated_by: i64, limit: u64)
    -> Result<Vec<GeneratedReport>>;
    async fn archive_generated_report(&self, id: i64) -> Result<Option<GeneratedReport>>;
    async fn delete_generated_report(&self, id: i64) -> Result<bool>;

    /// 首页组件方法
    async fn create_widget(&self, req: CreateWidgetRequest) -> Result<DashboardWidget>;
    async fn get_widget(&self, id: i64) -> Result<Option<DashboardWidget>>;
    async fn list_widgets(&self, active_only: bool) -> Result<Vec<DashboardWidget>>;
    async fn update_widget(
        &self,
        id: i64,
        update: UpdateWidgetRequest,
    ) -> Result<Option<DashboardWidget>>;
    async fn delete_widget(&self, id: i64) -> Result<bool>;

    /// 定时报表方法
    async fn create_schedule(
        &self,
        req: CreateScheduleRequest,
        created_by: i64,
        next_run: Option<i64>,
    ) -> Result<ReportSchedule>;
    async fn get_schedule(&self, id: i64) -> Result<Option<ReportSchedule>>;
    async fn list_schedules(&self) -> Result<Vec<ReportSchedule>>;
    async fn update_schedule(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
        next_run: Option<i64>,
    ) -> Result<Option<ReportSchedule>>;
    async fn delete_schedule(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
