use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub invite: InviteConfig,
    pub cache: CacheConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            system_name: "Materia".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// 邀请码配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteConfig {
    pub code_length: usize,         // 邀请码长度
    pub max_generate_attempts: u32, // 生成时的最大重试次数
    pub link_host: String,          // 邀请链接的主机名
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            code_length: 8,
            max_generate_attempts: 10,
            link_host: "materia.app".to_string(),
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl: u64, // 冷读取的有效期 (秒)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: 300 }
    }
}
