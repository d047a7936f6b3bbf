use order_reconcile::{router, AppConfig, AppState};
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Layered config failed ({}), falling back to environment", e);
        AppConfig::from_env()
    });
    info!("Starting server with config: {:?}", config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    if let Some(dir) = &config.export.dir {
        std::fs::create_dir_all(dir)?;
    }

    let app = router(AppState::new(config));

    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST   /api/prepare                          - 扫描缺失品牌/类型");
    info!("  POST   /api/sessions                         - 创建导入会话 (自动配对)");
    info!("  PUT    /api/sessions/:id/items/:index/role   - 设置定金/尾款角色");
    info!("  POST   /api/sessions/:id/pairs               - 手动配对");
    info!("  DELETE /api/sessions/:id/items/:index/pair   - 取消配对");
    info!("  POST   /api/sessions/:id/commit              - 提交");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
