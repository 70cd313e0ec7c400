//! 送信ファイルの収集
//!
//! 引数で渡されたファイル・フォルダから FileBlob を作る。
//! - フォルダは対応拡張子のファイルのみ（ファイル名順）
//! - 明示指定されたファイルは拡張子に関係なく含める（検査はゲートウェイ側）
//! - 同じパス・同じ内容のファイルは1回だけ送る
//! - サイズ上限を超えるファイル・読めないファイルは読み込まずに除外として返す

use crate::error::{ClassifyError, Result};
use doc_classify_common::gateway::mime_type_for_name;
use doc_classify_common::{exceeds_size_limit, FileBlob, RejectReason, RejectedFile};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 収集結果
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<FileBlob>,
    /// 内容またはパスが重複していたため除いたファイル
    pub duplicates: Vec<PathBuf>,
    /// 読み込まずに除外したファイル（サイズ超過・読み込み失敗）
    pub excluded: Vec<RejectedFile>,
}

/// パスの一覧からファイルを収集
pub fn scan_paths(paths: &[PathBuf], recursive: bool) -> Result<ScanResult> {
    let mut candidates = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(ClassifyError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            candidates.extend(scan_folder(path, recursive));
        } else {
            candidates.push(path.clone());
        }
    }

    let mut result = ScanResult::default();
    let mut seen_paths = HashSet::new();
    let mut seen_hashes = HashSet::new();

    for path in candidates {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        if !seen_paths.insert(canonical) {
            result.duplicates.push(path);
            continue;
        }

        let content = match read_within_limit(&path) {
            Ok(content) => content,
            Err(reason) => {
                tracing::debug!(path = %path.display(), %reason, "excluded before upload");
                result.excluded.push(RejectedFile { name: file_name_of(&path), reason });
                continue;
            }
        };
        if !seen_hashes.insert(content_hash(&content)) {
            tracing::debug!(path = %path.display(), "duplicate content skipped");
            result.duplicates.push(path);
            continue;
        }

        result.files.push(load_blob(&path, content));
    }

    Ok(result)
}

/// フォルダ内の対応ファイル（ファイル名順）
fn scan_folder(folder: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_supported_document(p))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    files
}

/// サイズを確認してから読み込む
fn read_within_limit(path: &Path) -> std::result::Result<Vec<u8>, RejectReason> {
    let size = std::fs::metadata(path)
        .map_err(|e| RejectReason::Unreadable(e.to_string()))?
        .len();
    if exceeds_size_limit(size) {
        return Err(RejectReason::TooLarge { size });
    }
    std::fs::read(path).map_err(|e| RejectReason::Unreadable(e.to_string()))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn load_blob(path: &Path, content: Vec<u8>) -> FileBlob {
    let file_name = file_name_of(path);
    let mime_type = mime_type_for_name(&file_name).unwrap_or_default();

    FileBlob::new(file_name, mime_type, content)
}

/// 対応拡張子か判定
pub fn is_supported_document(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(mime_type_for_name)
        .is_some()
}

fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
