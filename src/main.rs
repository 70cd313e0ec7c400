use clap::Parser;
use doc_classify::{cli, config, error, export, report, scanner, transport};
use cli::{Cli, Commands};
use config::Config;
use doc_classify_common::{classify_url, RecordFilter, SessionController, UploadGateway};
use error::{ClassifyError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Classify { paths, output, base_url, recursive, category, status } => {
            println!("📄 doc-classify - 書類分類\n");

            // 1. ファイル収集
            println!("[1/3] ファイルを収集中...");
            let scan = scanner::scan_paths(&paths, recursive)?;
            for duplicate in &scan.duplicates {
                println!("- 重複のためスキップ: {}", duplicate.display());
            }
            print!("{}", report::render_excluded(&scan.excluded));
            println!("✔ {}件のファイルを検出\n", scan.files.len());

            if scan.files.is_empty() {
                let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                return Err(ClassifyError::NoFilesFound(joined.join(", ")));
            }

            // 2. 送信
            let base_url = config.resolve_base_url(base_url.as_deref())?;
            let gateway = UploadGateway::new(transport::ReqwestTransport::new(&base_url)?);
            let mut session = SessionController::new();

            println!("[2/3] 分類中... ({})", classify_url(&base_url));
            let spinner = upload_spinner(scan.files.len());
            let ids = session.submit(&gateway, scan.files).await?;
            spinner.finish_and_clear();

            print!("{}", report::render_excluded(session.excluded()));
            if let Some(message) = session.last_error() {
                return Err(ClassifyError::Submission(message.to_string()));
            }
            if ids.is_empty() {
                println!("\n送信対象のファイルがありませんでした");
                return Ok(());
            }
            println!("✔ {}件の結果を受信\n", ids.len());

            // 3. 表示・出力
            println!("[3/3] 結果");
            let filter = RecordFilter { category, status };
            print!("{}", report::render_results(&session, &filter));
            println!("{}", report::render_summary(&session));

            if let Some(output) = output {
                let today = chrono::Local::now().date_naive();
                let artifact = session.export(today)?;
                let path = export::write_artifact(&artifact, &output)?;
                println!("✔ 結果を保存: {}", path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Config { set_base_url, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url);
                println!("  エンドポイント: {}", classify_url(&config.base_url));
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn upload_spinner(count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner} {msg} ({elapsed})") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("{}件を送信中", count));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
