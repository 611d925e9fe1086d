//! 对象缓存
//!
//! 后端以插件形式在进程启动前注册（`declare_object_cache_plugin!`），
//! 启动时按 `cache.type` 选择，Redis 不可用时回退到内存缓存。

pub mod object_cache;
pub mod register;
mod traits;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

pub use traits::{CacheResult, ObjectCache};

/// 注册缓存插件
///
/// 构造函数返回 `Result<Self, String>`，失败信息转为 `CacheConnection` 错误。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[::ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                            .map_err($crate::errors::AttendanceError::cache_connection)
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}

/// 已登录用户的缓存键
///
/// 按用户 ID 而不是令牌缓存，审核状态变化时可以直接清除。
pub fn user_cache_key(user_id: i64) -> String {
    format!("auth:user:{user_id}")
}

impl dyn ObjectCache {
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key).await.found()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("缓存反序列化失败 {key}: {e}");
                self.remove(key).await;
                None
            }
        }
    }

    pub async fn insert_json<T: Serialize>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(json) => self.insert_raw(key, json, ttl).await,
            Err(e) => debug!("缓存序列化失败 {key}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_json_round_trip_and_corrupt_entry() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(16, 60));
        cache
            .insert_json("k".to_string(), &vec![1_i64, 2, 3], 0)
            .await;
        assert_eq!(cache.get_json::<Vec<i64>>("k").await, Some(vec![1, 2, 3]));

        cache.insert_raw("bad".to_string(), "{".to_string(), 0).await;
        assert_eq!(cache.get_json::<Vec<i64>>("bad").await, None);
        assert_eq!(cache.get_raw("bad").await, CacheResult::NotFound);
    }

    #[test]
    fn test_user_cache_key() {
        assert_eq!(user_cache_key(42), "auth:user:42");
    }
}
