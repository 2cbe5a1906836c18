use anyhow::Result;
use tracing::info;

use todo_service::{config::Config, infrastructure::logger::init_logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // guard 需要活到进程结束
    let _guard = init_logging(&config.logging)?;

    info!("启动 Todo API 服务器...");
    server::run(config).await
}
