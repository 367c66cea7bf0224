/*!
 * 速率限制中间件
 *
 * 固定窗口计数。窗口从第一次请求开始计时，到期后整体重开，
 * 窗口内的后续请求不会延长窗口。
 *
 * ## 限制规则
 *
 * | 端点 | 限额 | 计数键 |
 * |------|------|--------|
 * | 登录 | 5 次 / 60 秒 | 客户端 IP |
 * | 刷新令牌 | 10 次 / 60 秒 | 客户端 IP |
 * | 上传作业 | 10 次 / 60 秒 | 学生 ID + 作业 ID |
 *
 * 上传限制挂在 `RequireRole` 之内，此时请求扩展里一定有当前用户；
 * 路径参数 `{id}` 即作业 ID。超过限额返回 429，`Retry-After` 为窗口剩余秒数。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

// 所有预设窗口都不超过 60 秒；TTL 只负责清理闲置条目
static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(120))
        .max_capacity(100_000)
        .build()
});

/// 一个计数窗口
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    opened: Instant,
    hits: u32,
}

impl Window {
    /// 记一次请求；上一个窗口已到期则从当前时刻重开
    fn hit(prev: Option<Window>, now: Instant, span: Duration) -> Window {
        match prev {
            Some(w) if now.saturating_duration_since(w.opened) < span => Window {
                opened: w.opened,
                hits: w.hits.saturating_add(1),
            },
            _ => Window {
                opened: now,
                hits: 1,
            },
        }
    }

    /// 窗口剩余秒数，至少 1
    fn retry_after(&self, now: Instant, span: Duration) -> u64 {
        let left = span.saturating_sub(now.saturating_duration_since(self.opened));
        left.as_secs().max(1)
    }
}

/// 计数键的来源
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyBy {
    ClientIp,
    StudentAssignment,
}

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    bucket: &'static str,
    key_by: KeyBy,
}

impl RateLimit {
    const fn preset(
        max_requests: u32,
        window_secs: u64,
        bucket: &'static str,
        key_by: KeyBy,
    ) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            bucket,
            key_by,
        }
    }

    pub fn login() -> Self {
        Self::preset(5, 60, "login", KeyBy::ClientIp)
    }

    pub fn refresh_token() -> Self {
        Self::preset(10, 60, "refresh", KeyBy::ClientIp)
    }

    /// 同一学生对同一作业的上传次数
    pub fn submission() -> Self {
        Self::preset(10, 60, "submit", KeyBy::StudentAssignment)
    }
}

// 反向代理场景下 actix 会按 Forwarded / X-Forwarded-For 解析
fn client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

fn bucket_key(bucket: &str, key_by: KeyBy, req: &ServiceRequest) -> String {
    if key_by == KeyBy::StudentAssignment {
        let user_id = req.extensions().get::<User>().map(|u| u.id);
        match (user_id, req.match_info().get("id")) {
            (Some(user), Some(assignment)) => {
                return format!("{bucket}:user:{user}:assignment:{assignment}");
            }
            (Some(user), None) => return format!("{bucket}:user:{user}"),
            // 未认证的请求按 IP 计
            _ => {}
        }
    }
    format!("{bucket}:ip:{}", client_ip(req))
}

fn too_many_requests(limit: u32, retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Limit", limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = bucket_key(limit.bucket, limit.key_by, &req);
            let now = Instant::now();
            let span = limit.window;

            // 读改写在同一个条目锁内完成，并发请求不会丢计数
            let window = WINDOWS
                .entry(key.clone())
                .and_upsert_with(|prev| {
                    ready(Window::hit(prev.map(|e| e.into_value()), now, span))
                })
                .await
                .into_value();

            if window.hits > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{} in {}s window)",
                    key,
                    window.hits,
                    limit.max_requests,
                    span.as_secs()
                );
                let retry_after = window.retry_after(now, span);
                return Ok(req.into_response(
                    too_many_requests(limit.max_requests, retry_after).map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}
