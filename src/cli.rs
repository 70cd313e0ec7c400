use clap::{Parser, Subcommand};
use doc_classify_common::PresentationStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doc-classify")]
#[command(about = "書類（PDF/画像）を分類サービスへ送信し、結果を確認・出力するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ファイル/フォルダを送信して分類結果を表示
    Classify {
        /// 送信するファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 結果JSONの出力先（フォルダ指定時は推奨ファイル名で保存）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 分類サービスのベースURL（設定ファイル・環境変数より優先）
        #[arg(long)]
        base_url: Option<String>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 表示するカテゴリ（完全一致）
        #[arg(short, long)]
        category: Option<String>,

        /// 表示する検証ステータス (error/validated/partially-invalid/pending)
        #[arg(short, long)]
        status: Option<PresentationStatus>,
    },

    /// 設定を表示/編集
    Config {
        /// ベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
