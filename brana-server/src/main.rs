use brana_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment().map_err(|e| anyhow::anyhow!("{}", e))?;
    print_banner();

    // 2. 加载配置
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        port = config.http_port,
        "BRANA KIDS server starting..."
    );

    // 3. 初始化数据库、JWT、图片存储
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    if let Err(e) = Server::new(config, state).run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
