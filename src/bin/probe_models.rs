use brandcheck::adapters::gemini::build_http_client;
use brandcheck::domain::model::ProbeStatus;
use brandcheck::utils::error::Result;
use brandcheck::utils::logger;
use brandcheck::{CliArgs, GeminiClientFactory, ModelProbe, Settings};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, false);

    println!("🔍 Testing generator API key");

    // 載入並驗證配置
    let settings = Settings::load(&cli)?;
    let generator = &settings.generator;

    println!("📋 API key: {}", generator.api_key_preview());
    println!("🌐 Endpoint: {}", generator.base_url);

    let http = build_http_client(generator.timeout)?;
    let factory = Arc::new(GeminiClientFactory::new(http, generator));
    let probe = ModelProbe::new(factory, generator.candidate_models());

    println!("🧪 Testing {} model(s)...\n", probe.models().len());
    let report = probe.key_report(generator.api_key_preview()).await;

    for (idx, test) in report.models_test.iter().enumerate() {
        let icon = if test.is_success() { "✅" } else { "❌" };
        let detail = match (&test.error_type, &test.response) {
            (Some(error_type), _) => error_type.clone(),
            (None, Some(response)) => format!("\"{}\"", response),
            (None, None) => "ok".to_string(),
        };
        println!("  {}. {} {}: {}", idx + 1, icon, test.model, detail);
    }
    println!();

    match report.final_status {
        ProbeStatus::Success => {
            println!("🎉 STATUS: SUCCESS");
            if let Some(model) = &report.working_model {
                println!("📦 Working model: {}", model);
            }
        }
        ProbeStatus::Failed => {
            println!("❌ STATUS: FAILED");
            println!("💡 {}", report.recommendation);
            std::process::exit(2);
        }
    }

    Ok(())
}
