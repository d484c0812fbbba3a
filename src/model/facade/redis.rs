use crate::erx;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, FromRedisValue, ToRedisArgs};
use std::fmt::Display;
use tokio::sync::OnceCell;

pub struct Redis {
    client: redis::Client,
    conn: OnceCell<MultiplexedConnection>,
}

pub type Facade<T> = erx::ResultE<T>;
pub type FacadeBool = Facade<bool>;
pub type FacadeInt = Facade<i64>;
pub type FacadeEx = Facade<()>;

macro_rules! redis_c {
    // 基本形式：方法名、参数列表、返回类型
    ($method_name:ident, ($($arg_name:ident: $arg_type:ty),*), $return_type:ty) => {
        pub async fn $method_name(&self, $($arg_name: $arg_type),*) -> $return_type {
            let mut conn = self.get_connection().await?;
            conn.$method_name($($arg_name),*).await.map_err(|e| self.fail(e))
        }
    };

    // 支持显式指定 Redis 方法名
    ($method_name:ident, redis: $redis_method:ident, ($($arg_name:ident: $arg_type:ty),*), $return_type:ty, generics: [$($generic:tt)*]) => {
        pub async fn $method_name<$($generic)*>(&self, $($arg_name: $arg_type),*) -> $return_type {
            let mut conn = self.get_connection().await?;
            conn.$redis_method($($arg_name),*).await.map_err(|e| self.fail(e))
        }
    };

    // 支持泛型参数的方法
    ($method_name:ident, ($($arg_name:ident: $arg_type:ty),*), $return_type:ty, generics: [$($generic:tt)*]) => {
        pub async fn $method_name<$($generic)*>(&self, $($arg_name: $arg_type),*) -> $return_type {
            let mut conn = self.get_connection().await?;
            conn.$method_name($($arg_name),*).await.map_err(|e| self.fail(e))
        }
    };
}

impl Redis {
    pub fn open(connect: &str) -> erx::ResultE<Self> {
        let client = redis::Client::open(connect).map_err(erx::amp("redis open"))?;
        Ok(Self::new(client))
    }

    pub fn new(c: redis::Client) -> Self {
        Redis { client: c, conn: OnceCell::new() }
    }

    /// shared multiplexed connection, established on first use
    pub async fn get_connection(&self) -> erx::ResultE<MultiplexedConnection> {
        let conn = self
            .conn
            .get_or_try_init(|| async { self.client.get_multiplexed_async_connection().await })
            .await
            .map_err(|e| self.fail(e))?;
        Ok(conn.clone())
    }

    fn fail<E: Display>(&self, e: E) -> erx::Erx {
        tracing::error!("Redis error: {}", e);
        erx::smp(e)
    }

    redis_c!(ttl, (key: &str), FacadeInt);
    redis_c!(del, (key: &str), FacadeBool);

    redis_c!(get, (key: &str), Facade<RV>, generics: [RV: FromRedisValue]);
    redis_c!(getdel, redis: get_del, (key: &str), Facade<RV>, generics: [RV: FromRedisValue]);
    redis_c!(set_ex, (key: &str, val: T, seconds: u64), FacadeEx, generics: [T: ToRedisArgs + Send + Sync]);
}
