// 运行配置
//
// 所有配置项都来自环境变量（支持 .env 文件），
// 无效值会记录警告并回退到默认值。

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tmdb: TmdbConfig,
    pub cache: CacheSettings,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// TMDB 接口配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    /// 未设置时目录不可用
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub request_timeout_secs: u64,
}

/// 查询缓存配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub max_capacity: u64,
    pub maintenance_secs: u64,
    /// 失败结果保留的秒数，期间不重复请求
    pub failure_ttl_secs: u64,
}

/// 响应式布局配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// 视口宽度不超过该值时使用紧凑分页
    pub mobile_breakpoint: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            language: "en-US".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            // 查询结果缓存5分钟
            ttl_secs: 5 * 60,
            max_capacity: 1_000,
            maintenance_secs: 60,
            failure_ttl_secs: 5,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.server.host),
                port: parse_or(&lookup, "PORT", defaults.server.port),
            },
            tmdb: TmdbConfig {
                api_key: lookup("TMDB_API_KEY").filter(|key| !key.trim().is_empty()),
                base_url: lookup("TMDB_BASE_URL").unwrap_or(defaults.tmdb.base_url),
                image_base_url: lookup("TMDB_IMAGE_BASE_URL").unwrap_or(defaults.tmdb.image_base_url),
                language: lookup("TMDB_LANGUAGE").unwrap_or(defaults.tmdb.language),
                request_timeout_secs: parse_or(
                    &lookup,
                    "REQUEST_TIMEOUT_SECS",
                    defaults.tmdb.request_timeout_secs,
                ),
            },
            cache: CacheSettings {
                ttl_secs: parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache.ttl_secs),
                max_capacity: parse_or(&lookup, "CACHE_MAX_CAPACITY", defaults.cache.max_capacity),
                maintenance_secs: parse_or(
                    &lookup,
                    "CACHE_MAINTENANCE_SECS",
                    defaults.cache.maintenance_secs,
                ),
                failure_ttl_secs: parse_or(
                    &lookup,
                    "CACHE_FAILURE_TTL_SECS",
                    defaults.cache.failure_ttl_secs,
                ),
            },
            layout: LayoutConfig {
                mobile_breakpoint: parse_or(
                    &lookup,
                    "MOBILE_BREAKPOINT",
                    defaults.layout.mobile_breakpoint,
                ),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}
