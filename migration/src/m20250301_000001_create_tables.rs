use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::UserType).string().not_null())
                    .col(ColumnDef::new(Users::PhoneNumber).string().null())
                    .col(ColumnDef::new(Users::Department).string().null())
                    .col(ColumnDef::new(Users::AccountStatus).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Users::ApprovedBy).big_integer().null())
                    .col(ColumnDef::new(Users::ApprovedAt).big_integer().null())
                    .col(ColumnDef::new(Users::RejectionReason).text().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::Level).string().not_null())
                    .col(ColumnDef::new(Courses::DurationMonths).integer().not_null())
                    .col(ColumnDef::new(Courses::Department).string().not_null())
                    .col(ColumnDef::new(Courses::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::CourseId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Classes::ClassCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::InstructorId).big_integer().null())
                    .col(ColumnDef::new(Classes::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Classes::Semester).integer().not_null())
                    .col(ColumnDef::new(Classes::StartDate).string().not_null())
                    .col(ColumnDef::new(Classes::EndDate).string().not_null())
                    .col(ColumnDef::new(Classes::MeetingDays).string().not_null())
                    .col(ColumnDef::new(Classes::MeetingTime).string().not_null())
                    .col(ColumnDef::new(Classes::Venue).string().not_null())
                    .col(ColumnDef::new(Classes::MaxStudents).integer().not_null())
                    .col(ColumnDef::new(Classes::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生档案表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Students::AdmissionNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::NationalId).string().null())
                    .col(ColumnDef::new(Students::DateOfBirth).string().not_null())
                    .col(ColumnDef::new(Students::Gender).string().not_null())
                    .col(ColumnDef::new(Students::Address).text().not_null())
                    .col(ColumnDef::new(Students::County).string().not_null())
                    .col(ColumnDef::new(Students::SubCounty).string().not_null())
                    .col(ColumnDef::new(Students::Ward).string().not_null())
                    .col(
                        ColumnDef::new(Students::PhoneNumberAlternative)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::EmergencyContactName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::EmergencyContactPhone)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::EmergencyContactRelationship)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::YearOfAdmission)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::CurrentClassId).big_integer().null())
                    .col(ColumnDef::new(Students::CourseId).big_integer().null())
                    .col(ColumnDef::new(Students::Status).string().not_null())
                    .col(ColumnDef::new(Students::IsBoarding).boolean().not_null())
                    .col(
                        ColumnDef::new(Students::HasSpecialNeeds)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::SpecialNeedsDescription)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::ParentName).string().not_null())
                    .col(ColumnDef::new(Students::ParentPhone).string().not_null())
                    .col(ColumnDef::new(Students::ParentEmail).string().not_null())
                    .col(
                        ColumnDef::new(Students::ParentOccupation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::LastAttendanceDate).string().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::CurrentClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选课表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::ClassId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrollmentDate)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::EnrollmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Enrollments::CompletionDate).string().null())
                    .col(ColumnDef::new(Enrollments::Remarks).text().not_null())
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学业成绩表
        manager
            .create_table(
                Table::create()
                    .table(AcademicRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicRecords::ModuleCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicRecords::ModuleName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicRecords::Grade).string().not_null())
                    .col(ColumnDef::new(AcademicRecords::Score).double().not_null())
                    .col(
                        ColumnDef::new(AcademicRecords::Semester)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicRecords::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicRecords::Remarks).text().not_null())
                    .col(
                        ColumnDef::new(AcademicRecords::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicRecords::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicRecords::Table, AcademicRecords::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤课次表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::SessionDate)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::StartTime)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::EndTime)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::TopicCovered)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceSessions::Venue).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceSessions::AttendanceMethod)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::QrCodeData)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::QrCodeExpiry)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::TotalPresent)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::TotalAbsent)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::TotalLate)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::ClosedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceSessions::Table, AttendanceSessions::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceSessions::Table, AttendanceSessions::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤记录表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Status).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceRecords::CheckInTime)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::CheckOutTime)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::MarkTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::MarkedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::IsExcused)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::ExcuseReason)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Remarks).text().not_null())
                    .col(
                        ColumnDef::new(AttendanceRecords::LateMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::SessionId)
                            .to(AttendanceSessions::Table, AttendanceSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::MarkedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤汇总表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceSummaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceSummaries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::PeriodType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::PeriodStart)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::PeriodEnd)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::TotalSessions)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::PresentCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::AbsentCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::LateCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::ExcusedCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::AttendanceRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::PunctualityRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::PreviousPeriodRate)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::Trend)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSummaries::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceSummaries::Table, AttendanceSummaries::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceSummaries::Table, AttendanceSummaries::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建请假申请表
        manager
            .create_table(
                Table::create()
                    .table(ExcuseApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExcuseApplications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::AttendanceSessionId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(ExcuseApplications::Reason).text().not_null())
                    .col(
                        ColumnDef::new(ExcuseApplications::StartDate)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::EndDate)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::ReviewedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::ReviewNotes)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::AppliedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExcuseApplications::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExcuseApplications::Table, ExcuseApplications::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExcuseApplications::Table, ExcuseApplications::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ExcuseApplications::Table,
                                ExcuseApplications::AttendanceSessionId,
                            )
                            .to(AttendanceSessions::Table, AttendanceSessions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExcuseApplications::Table, ExcuseApplications::ReviewedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 联合唯一约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_enrollments_student_class")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ClassId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_sessions_class_date_start")
                    .table(AttendanceSessions::Table)
                    .col(AttendanceSessions::ClassId)
                    .col(AttendanceSessions::SessionDate)
                    .col(AttendanceSessions::StartTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_records_session_student")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::SessionId)
                    .col(AttendanceRecords::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_summaries_student_class_period")
                    .table(AttendanceSummaries::Table)
                    .col(AttendanceSummaries::StudentId)
                    .col(AttendanceSummaries::ClassId)
                    .col(AttendanceSummaries::PeriodType)
                    .col(AttendanceSummaries::PeriodStart)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 普通索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_user_type")
                    .table(Users::Table)
                    .col(Users::UserType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classes_instructor_id")
                    .table(Classes::Table)
                    .col(Classes::InstructorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_session_date")
                    .table(AttendanceSessions::Table)
                    .col(AttendanceSessions::SessionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_records_student_id")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_excuses_student_id")
                    .table(ExcuseApplications::Table)
                    .col(ExcuseApplications::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(ExcuseApplications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceSummaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    UserType,
    PhoneNumber,
    Department,
    AccountStatus,
    IsActive,
    ApprovedBy,
    ApprovedAt,
    RejectionReason,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Code,
    Name,
    Description,
    Level,
    DurationMonths,
    Department,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    CourseId,
    ClassCode,
    Name,
    InstructorId,
    AcademicYear,
    Semester,
    StartDate,
    EndDate,
    MeetingDays,
    MeetingTime,
    Venue,
    MaxStudents,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserId,
    AdmissionNumber,
    NationalId,
    DateOfBirth,
    Gender,
    Address,
    County,
    SubCounty,
    Ward,
    PhoneNumberAlternative,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelationship,
    YearOfAdmission,
    CurrentClassId,
    CourseId,
    Status,
    IsBoarding,
    HasSpecialNeeds,
    SpecialNeedsDescription,
    ParentName,
    ParentPhone,
    ParentEmail,
    ParentOccupation,
    LastAttendanceDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    CourseId,
    ClassId,
    EnrollmentDate,
    EnrollmentType,
    IsActive,
    CompletionDate,
    Remarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AcademicRecords {
    #[sea_orm(iden = "academic_records")]
    Table,
    Id,
    StudentId,
    ModuleCode,
    ModuleName,
    Grade,
    Score,
    Semester,
    AcademicYear,
    Remarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AttendanceSessions {
    #[sea_orm(iden = "attendance_sessions")]
    Table,
    Id,
    ClassId,
    InstructorId,
    SessionDate,
    StartTime,
    EndTime,
    TopicCovered,
    Venue,
    AttendanceMethod,
    QrCodeData,
    QrCodeExpiry,
    Status,
    TotalPresent,
    TotalAbsent,
    TotalLate,
    CreatedAt,
    UpdatedAt,
    ClosedAt,
}

#[derive(DeriveIden)]
enum AttendanceRecords {
    #[sea_orm(iden = "attendance_records")]
    Table,
    Id,
    SessionId,
    StudentId,
    Status,
    CheckInTime,
    CheckOutTime,
    MarkTime,
    MarkedBy,
    IsExcused,
    ExcuseReason,
    Remarks,
    LateMinutes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AttendanceSummaries {
    #[sea_orm(iden = "attendance_summaries")]
    Table,
    Id,
    StudentId,
    ClassId,
    PeriodType,
    PeriodStart,
    PeriodEnd,
    TotalSessions,
    PresentCount,
    AbsentCount,
    LateCount,
    ExcusedCount,
    AttendanceRate,
    PunctualityRate,
    PreviousPeriodRate,
    Trend,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExcuseApplications {
    #[sea_orm(iden = "excuse_applications")]
    Table,
    Id,
    StudentId,
    ClassId,
    AttendanceSessionId,
    Reason,
    StartDate,
    EndDate,
    Status,
    ReviewedBy,
    ReviewNotes,
    ReviewedAt,
    AppliedAt,
    UpdatedAt,
}
