use crate::error::FileError;
use crate::models::input_file::InputFile;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从磁盘读取单个文件并转换为 InputFile 对象
///
/// 文件名只保留最后一段路径。
pub async fn load_input_file(path: &Path) -> Result<InputFile, FileError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| FileError::InvalidName {
            path: path.to_path_buf(),
        })?;

    let content = fs::read(path).await.map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(InputFile::new(name, content))
}

/// 读取一组文件，组成新的选择
///
/// 读取失败的文件和目录会被跳过并记录警告，不影响其余文件。
/// 这里不做扩展名检查，.txt 过滤发生在提交时。
pub async fn load_input_files(paths: &[PathBuf]) -> Vec<InputFile> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        if fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false) {
            tracing::warn!("跳过目录: {}", path.display());
            continue;
        }

        match load_input_file(path).await {
            Ok(file) => {
                if file.is_empty() {
                    tracing::warn!("文件为空: {}", file.name);
                }
                tracing::debug!("已读取 {} ({} 字节)", file.name, file.len());
                files.push(file);
            }
            Err(e) => {
                tracing::warn!("读取文件失败，已跳过: {}", e);
            }
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blend_log.txt");
        std::fs::write(&path, "Blending: 60 RPM for 20 minutes").unwrap();

        let file = load_input_file(&path).await.unwrap();
        assert_eq!(file.name, "blend_log.txt");
        assert_eq!(file.content, b"Blending: 60 RPM for 20 minutes");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_input_file(&dir.path().join("gone.txt")).await.unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }

    #[tokio::test]
    async fn batch_skips_unreadable_entries_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.txt");
        let image = dir.path().join("b.png");
        std::fs::write(&good, "sampling plan").unwrap();
        std::fs::write(&image, [0x89u8, 0x50, 0x4e, 0x47]).unwrap();

        let paths = vec![
            good,
            dir.path().join("missing.txt"),
            dir.path().to_path_buf(),
            image,
        ];
        let files = load_input_files(&paths).await;
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.png"]);
    }
}
