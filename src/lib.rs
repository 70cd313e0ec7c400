//! doc-classify CLI
//!
//! 書類ファイルを分類サービスへ送信し、結果をカテゴリ別に表示・JSON出力する。
//! 集約・検証表示・エクスポートのロジックは doc_classify_common にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod scanner;
pub mod transport;
