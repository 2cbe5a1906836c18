//! 服务启动与关闭

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::app::build_app;
use crate::config::Config;
use crate::infrastructure::database::TodoStore;

/// 连接存储、监听端口并一直运行到收到停止信号
pub async fn run(config: Config) -> Result<()> {
    let store = TodoStore::connect(&config.database)
        .await
        .context("无法连接到数据存储")?;

    let app = build_app(&config, store.clone());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法绑定到 {}", addr))?;

    info!("🚀 Todo API 服务器运行在 http://{}", listener.local_addr()?);
    info!("📖 API 端点:");
    info!("   GET    /              - 健康检查");
    info!("   GET    /todos         - 获取全部待办事项 (最新的在前)");
    info!("   POST   /todos         - 创建待办事项");
    info!("   PUT    /todos/:id     - 更新待办事项");
    info!("   DELETE /todos/:id     - 删除待办事项");
    info!(
        "运行环境: {}，存储: {}，允许的跨域来源: {:?}",
        config.environment,
        store.kind(),
        config.cors.allowed_origins
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器运行失败")?;

    info!("收到停止信号，正在关闭服务器...");
    store.close().await;
    info!("服务器已安全关闭");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("无法监听 Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
