use crate::error::Result;
use doc_classify_common::ExportArtifact;
use std::path::{Path, PathBuf};

/// 出力先を決定
///
/// フォルダ（または拡張子なし）なら推奨ファイル名を付け、ファイルパスならそのまま使う
pub fn output_path_for(output: &Path, suggested_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(suggested_name)
    } else {
        output.to_path_buf()
    }
}

/// エクスポート結果を書き出し、書き出したパスを返す
pub fn write_artifact(artifact: &ExportArtifact, output: &Path) -> Result<PathBuf> {
    let path = output_path_for(output, &artifact.file_name);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&path, &artifact.bytes)?;
    tracing::debug!(path = %path.display(), bytes = artifact.bytes.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const NAME: &str = "mortgage_classification_results_2025-01-18.json";

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert_eq!(output_path_for(dir.path(), NAME), dir.path().join(NAME));
    }

    #[test]
    fn test_output_path_for_file() {
        let path = Path::new("/tmp/custom.json");
        assert_eq!(output_path_for(path, NAME), PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn test_output_path_without_extension_is_directory() {
        let path = Path::new("results");
        assert_eq!(output_path_for(path, NAME), PathBuf::from("results").join(NAME));
    }
}
