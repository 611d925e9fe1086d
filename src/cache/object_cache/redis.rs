use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Redis 地址无效 {}: {e}", redis_config.url))?;

        // 启动时同步 PING 一次，失败由调用方回退到内存缓存
        let mut conn = client.get_connection().map_err(|e| {
            error!("无法连接 Redis {}: {e}", redis_config.url);
            format!("Redis 连接失败: {e}")
        })?;
        let response: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis PING 失败: {e}"))?;
        debug!("Redis 连接正常: {response}");

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        let client = &self.client;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("获取 Redis 连接失败: {e}");
                return CacheResult::ExistsButNoValue;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(redis_key).await;

        match result {
            Ok(Some(data)) => {
                debug!("缓存命中: {key}");
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("缓存未命中: {key}");
                CacheResult::NotFound
            }
            Err(e) => {
                error!("读取缓存 {key} 失败: {e}");
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let redis_key = self.make_key(&key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("获取 Redis 连接失败: {e}");
                return;
            }
        };

        let effective_ttl = if ttl == 0 { self.ttl } else { ttl };

        if let Err(e) = conn
            .set_ex::<String, String, ()>(redis_key, value, effective_ttl)
            .await
        {
            error!("写入缓存 {key} 失败: {e}");
        }
    }

    async fn remove(&self, key: &str) {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("获取 Redis 连接失败: {e}");
                return;
            }
        };

        if let Err(e) = conn.del::<String, i32>(redis_key).await {
            error!("删除缓存 {key} 失败: {e}");
        }
    }

    /// 按前缀扫描删除，只影响本系统写入的键
    async fn invalidate_all(&self) {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("获取 Redis 连接失败: {e}");
                return;
            }
        };

        let pattern = format!("{}*", self.key_prefix);
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("扫描缓存键 {pattern} 失败: {e}");
                return;
            }
        };
        if keys.is_empty() {
            return;
        }

        if let Err(e) = conn.del::<_, i64>(keys).await {
            warn!("清空缓存失败: {e}");
        }
    }
}
