use brandcheck::adapters::gemini::build_http_client;
use brandcheck::domain::ports::TextGenerator;
use brandcheck::utils::error::{CheckError, ErrorSeverity};
use brandcheck::utils::logger;
use brandcheck::{
    build_router, AppState, CliArgs, GeminiClient, GeminiClientFactory, ModelProbe, Settings,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // 先載入 .env，clap 才讀得到環境變數
    dotenvy::dotenv().ok();
    let cli = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting brandcheck server");

    if let Err(e) = run(cli).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: CliArgs) -> Result<(), CheckError> {
    let settings = Settings::load(&cli)?;
    let generator_settings = &settings.generator;

    // 所有請求共用同一個 HTTP client
    let http = build_http_client(generator_settings.timeout)?;
    let factory = Arc::new(GeminiClientFactory::new(http.clone(), generator_settings));
    let probe = ModelProbe::new(factory, generator_settings.candidate_models());

    let generator: Arc<dyn TextGenerator> = if generator_settings.probe_models {
        tracing::info!("🔍 Probing {} model(s) for a working one", probe.models().len());
        probe.first_working().await?
    } else {
        Arc::new(GeminiClient::from_settings(http, generator_settings))
    };
    tracing::info!(model = generator.model(), "Generator ready");

    let state = AppState::new(
        generator,
        probe,
        settings.server.max_results,
        generator_settings.api_key_preview(),
    );
    let app = build_router(state);

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on {}", addr);
    tracing::info!("Check endpoint: POST http://{}/api/check-brand", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(error: &CheckError) -> i32 {
    match error.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
