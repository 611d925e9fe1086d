use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户类型
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserType {
    Admin,      // 管理员
    Instructor, // 任课教师
    Student,    // 学生
    Registrar,  // 教务员
    Hod,        // 系主任
}

impl UserType {
    pub const ADMIN: &'static str = "admin";
    pub const INSTRUCTOR: &'static str = "instructor";
    pub const STUDENT: &'static str = "student";
    pub const REGISTRAR: &'static str = "registrar";
    pub const HOD: &'static str = "hod";

    pub fn admin_roles() -> &'static [&'static UserType] {
        &[&Self::Admin]
    }
    /// 教务管理角色：可查看全部数据
    pub fn management_roles() -> &'static [&'static UserType] {
        &[&Self::Admin, &Self::Registrar, &Self::Hod]
    }
    /// 可以点名的角色
    pub fn instructor_roles() -> &'static [&'static UserType] {
        &[&Self::Instructor, &Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static UserType] {
        &[&Self::Admin, &Self::Instructor, &Self::Registrar, &Self::Hod]
    }
    pub fn all_roles() -> &'static [&'static UserType] {
        &[
            &Self::Admin,
            &Self::Instructor,
            &Self::Student,
            &Self::Registrar,
            &Self::Hod,
        ]
    }

    pub fn is_management(&self) -> bool {
        matches!(self, Self::Admin | Self::Registrar | Self::Hod)
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, Self::Student)
    }

    /// 自助注册的教职工账号需要管理员审核
    pub fn needs_approval(&self) -> bool {
        self.is_staff()
    }
}

impl<'de> Deserialize<'de> for UserType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户类型: '{s}'. 支持的类型: admin, instructor, student, registrar, hod"
            ))
        })
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Admin => write!(f, "{}", UserType::ADMIN),
            UserType::Instructor => write!(f, "{}", UserType::INSTRUCTOR),
            UserType::Student => write!(f, "{}", UserType::STUDENT),
            UserType::Registrar => write!(f, "{}", UserType::REGISTRAR),
            UserType::Hod => write!(f, "{}", UserType::HOD),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserType::ADMIN => Ok(UserType::Admin),
            UserType::INSTRUCTOR => Ok(UserType::Instructor),
            UserType::STUDENT => Ok(UserType::Student),
            UserType::REGISTRAR => Ok(UserType::Registrar),
            UserType::HOD => Ok(UserType::Hod),
            _ => Err(format!("Invalid user type: {s}")),
        }
    }
}

// 账号审核状态
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum AccountStatus {
    Pending,   // 待审核
    Approved,  // 已通过
    Rejected,  // 已拒绝
    Suspended, // 已停用
}

impl<'de> Deserialize<'de> for AccountStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AccountStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的账号状态: '{s}'. 支持的状态: pending, approved, rejected, suspended"
            ))
        })
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Pending => write!(f, "pending"),
            AccountStatus::Approved => write!(f, "approved"),
            AccountStatus::Rejected => write!(f, "rejected"),
            AccountStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AccountStatus::Pending),
            "approved" => Ok(AccountStatus::Approved),
            "rejected" => Ok(AccountStatus::Rejected),
            "suspended" => Ok(AccountStatus::Suspended),
            _ => Err(format!("Invalid account status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub account_status: AccountStatus,
    pub is_active: bool,
    pub approved_by: Option<i64>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub rejection_reason: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// 待审核且属于需要审核的用户类型
    pub fn needs_approval(&self) -> bool {
        self.account_status == AccountStatus::Pending && self.user_type.needs_approval()
    }

    /// 登录前置检查，返回拒绝原因
    pub fn login_block_reason(&self) -> Option<&'static str> {
        match self.account_status {
            AccountStatus::Pending => {
                Some("Your account is pending approval. Please wait for administrator approval.")
            }
            AccountStatus::Rejected => {
                Some("Your account has been rejected. Please contact the administrator.")
            }
            AccountStatus::Suspended => {
                Some("Your account has been suspended. Please contact the administrator.")
            }
            AccountStatus::Approved if !self.is_active => {
                Some("Your account is inactive. Please contact the administrator.")
            }
            AccountStatus::Approved => None,
        }
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        remember_me: bool,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.user_type.to_string(),
            remember_me,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

/// 账号审核动作产生的字段变更
#[derive(Debug, Clone, PartialEq)]
pub struct AccountStatusChange {
    pub account_status: AccountStatus,
    pub is_active: bool,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub rejection_reason: Option<String>,
}

impl AccountStatusChange {
    pub fn approve(admin_id: i64, now: i64) -> Self {
        Self {
            account_status: AccountStatus::Approved,
            is_active: true,
            approved_by: Some(admin_id),
            approved_at: Some(now),
            rejection_reason: None,
        }
    }

    pub fn reject(admin_id: i64, reason: &str, now: i64) -> Result<Self, &'static str> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err("Please provide a reason for rejection");
        }
        Ok(Self {
            account_status: AccountStatus::Rejected,
            is_active: false,
            approved_by: Some(admin_id),
            approved_at: Some(now),
            rejection_reason: Some(reason.to_string()),
        })
    }

    pub fn suspend(admin_id: i64, reason: &str, now: i64) -> Result<Self, &'static str> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err("Please provide a reason for suspension");
        }
        Ok(Self {
            account_status: AccountStatus::Suspended,
            is_active: false,
            approved_by: Some(admin_id),
            approved_at: Some(now),
            rejection_reason: Some(reason.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(user_type: UserType, status: AccountStatus, is_active: bool) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            username: "jdoe01".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            user_type,
            phone_number: None,
            department: None,
            account_status: status,
            is_active,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_type_round_trip_strings() {
        for t in UserType::all_roles() {
            assert_eq!(t.to_string().parse::<UserType>().unwrap(), **t);
        }
        assert!("teacher".parse::<UserType>().is_err());
    }

    #[test]
    fn test_needs_approval_only_for_pending_staff() {
        assert!(sample_user(UserType::Instructor, AccountStatus::Pending, false).needs_approval());
        assert!(sample_user(UserType::Hod, AccountStatus::Pending, false).needs_approval());
        assert!(!sample_user(UserType::Student, AccountStatus::Pending, false).needs_approval());
        assert!(!sample_user(UserType::Registrar, AccountStatus::Approved, true).needs_approval());
    }

    #[test]
    fn test_login_block_reason() {
        assert!(
            sample_user(UserType::Student, AccountStatus::Approved, true)
                .login_block_reason()
                .is_none()
        );
        assert!(
            sample_user(UserType::Student, AccountStatus::Approved, false)
                .login_block_reason()
                .is_some()
        );
        let pending = sample_user(UserType::Instructor, AccountStatus::Pending, false);
        assert!(pending.login_block_reason().unwrap().contains("pending"));
    }

    #[test]
    fn test_approve_activates_account() {
        let change = AccountStatusChange::approve(9, 1_700_000_000);
        assert_eq!(change.account_status, AccountStatus::Approved);
        assert!(change.is_active);
        assert_eq!(change.approved_by, Some(9));
        assert_eq!(change.approved_at, Some(1_700_000_000));
        assert!(change.rejection_reason.is_none());
    }

    #[test]
    fn test_reject_requires_reason() {
        assert!(AccountStatusChange::reject(9, "   ", 0).is_err());
        let change = AccountStatusChange::reject(9, "Incomplete documents", 0).unwrap();
        assert_eq!(change.account_status, AccountStatus::Rejected);
        assert!(!change.is_active);
        assert_eq!(
            change.rejection_reason.as_deref(),
            Some("Incomplete documents")
        );
    }

    #[test]
    fn test_suspend_deactivates() {
        let change = AccountStatusChange::suspend(9, "Policy violation", 0).unwrap();
        assert_eq!(change.account_status, AccountStatus::Suspended);
        assert!(!change.is_active);
    }

    #[test]
    fn test_full_name_falls_back_to_username() {
        let mut user = sample_user(UserType::Student, AccountStatus::Approved, true);
        assert_eq!(user.full_name(), "Jane Doe");
        user.first_name.clear();
        user.last_name.clear();
        assert_eq!(user.full_name(), "jdoe01");
    }
}
