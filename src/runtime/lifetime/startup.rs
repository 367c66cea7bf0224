use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::models::users::entities::{STUDENTS_GROUP, TEACHING_ASSISTANTS_GROUP};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::{SeaOrmStorage, Storage};
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 确保学生组与助教组存在
async fn seed_groups(storage: &Arc<dyn Storage>) {
    for name in [STUDENTS_GROUP, TEACHING_ASSISTANTS_GROUP] {
        match storage.ensure_group(name).await {
            Ok(id) => debug!("Group '{}' ready (ID: {})", name, id),
            Err(e) => warn!("Failed to ensure group '{}': {}", name, e),
        }
    }
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则创建一个超级用户
async fn seed_admin(storage: &Arc<dyn Storage>) {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    // 哈希密码
    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    // 管理员身份由用户名与超级用户标志共同决定
    let admin_username = &AppConfig::get().app.admin_username;
    let admin_request = CreateUserRequest {
        username: admin_username.clone(),
        email: format!("{admin_username}@localhost"),
        password: password_hash,
        display_name: Some("Administrator".to_string()),
        is_staff: true,
        is_superuser: true,
        groups: Vec::new(),
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储与缓存
pub async fn prepare_server_startup() -> StartupContext {
    let storage: Arc<dyn Storage> = match SeaOrmStorage::new_async().await {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            #[cfg(debug_assertions)]
            error!("{}", e.format_colored());
            #[cfg(not(debug_assertions))]
            error!("{}", e.format_simple());
            std::process::exit(1);
        }
    };
    warn!("Storage backend initialized and migrations completed");

    seed_groups(&storage).await;

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage).await;

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::default());
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}
