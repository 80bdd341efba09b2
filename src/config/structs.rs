use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub upload: UploadConfig,
    pub assessment: AssessmentConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 作业策略缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub default_ttl: u64,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: String,     // 上传目录
    pub max_size: usize, // 单文件最大字节数（全局硬上限）
}

/// 评测引擎策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub default_max_grade: f64,
    pub default_max_file_size_bytes: i64,
    // 学年起始月份（默认 9 月）
    pub academic_year_start_month: u32,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            default_max_grade: 10.0,
            default_max_file_size_bytes: 10 * 1024 * 1024,
            academic_year_start_month: 9,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            max_capacity: 10_000,
        }
    }
}
