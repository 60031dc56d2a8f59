use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortkeepError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    /// 存储暂时不可用（连接失败、超时、锁竞争），调用方可以重试
    StoreUnavailable(String),
    /// 条件写入 / 条件删除的谓词不成立
    PredicateFailed(String),
    /// 存储返回了违反约定的数据，不应在本地恢复
    InvariantViolation(String),
    Serialization(String),
    FileOperation(String),
}

impl ShortkeepError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortkeepError::DatabaseConfig(_) => "E001",
            ShortkeepError::DatabaseConnection(_) => "E002",
            ShortkeepError::DatabaseOperation(_) => "E003",
            ShortkeepError::StoreUnavailable(_) => "E004",
            ShortkeepError::PredicateFailed(_) => "E005",
            ShortkeepError::InvariantViolation(_) => "E006",
            ShortkeepError::Serialization(_) => "E007",
            ShortkeepError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortkeepError::DatabaseConfig(_) => "Database Configuration Error",
            ShortkeepError::DatabaseConnection(_) => "Database Connection Error",
            ShortkeepError::DatabaseOperation(_) => "Database Operation Error",
            ShortkeepError::StoreUnavailable(_) => "Store Unavailable",
            ShortkeepError::PredicateFailed(_) => "Conditional Check Failed",
            ShortkeepError::InvariantViolation(_) => "Invariant Violation",
            ShortkeepError::Serialization(_) => "Serialization Error",
            ShortkeepError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortkeepError::DatabaseConfig(msg)
            | ShortkeepError::DatabaseConnection(msg)
            | ShortkeepError::DatabaseOperation(msg)
            | ShortkeepError::StoreUnavailable(msg)
            | ShortkeepError::PredicateFailed(msg)
            | ShortkeepError::InvariantViolation(msg)
            | ShortkeepError::Serialization(msg)
            | ShortkeepError::FileOperation(msg) => msg,
        }
    }

    /// Whether a caller may safely retry the failed operation.
    ///
    /// Only infrastructure hiccups qualify; domain outcomes and invariant
    /// violations never do.
    pub fn is_transient(&self) -> bool {
        matches!(self, ShortkeepError::StoreUnavailable(_))
    }

    /// 格式化为彩色输出（用于 Server 启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortkeepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortkeepError {}

// 便捷的构造函数
impl ShortkeepError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::DatabaseOperation(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::StoreUnavailable(msg.into())
    }

    pub fn predicate_failed<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::PredicateFailed(msg.into())
    }

    pub fn invariant_violation<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::InvariantViolation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortkeepError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShortkeepError {
    fn from(err: sea_orm::DbErr) -> Self {
        if crate::storage::backend::classify::is_transient_error(&err) {
            ShortkeepError::StoreUnavailable(err.to_string())
        } else {
            ShortkeepError::DatabaseOperation(err.to_string())
        }
    }
}

impl From<std::io::Error> for ShortkeepError {
    fn from(err: std::io::Error) -> Self {
        ShortkeepError::FileOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortkeepError>;
