//! 输入文件模型

use std::fmt;

/// 可提交文件的扩展名（不区分大小写）
pub const ELIGIBLE_EXTENSION: &str = ".txt";

/// 待上传的批次文件
#[derive(Clone, PartialEq, Eq)]
pub struct InputFile {
    /// 文件名（只含最后一段，不含目录）
    pub name: String,
    /// 文件原始内容
    pub content: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// 文件名是否以 `.txt` 结尾
    pub fn is_eligible(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(ELIGIBLE_EXTENSION)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// 内容可能很大，Debug 只输出长度
impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputFile")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// 把选择拆分为 (可提交文件, 被跳过的文件名)
///
/// 保持原有顺序。
pub fn partition_eligible(files: &[InputFile]) -> (Vec<InputFile>, Vec<String>) {
    let mut eligible = Vec::new();
    let mut skipped = Vec::new();
    for file in files {
        if file.is_eligible() {
            eligible.push(file.clone());
        } else {
            skipped.push(file.name.clone());
        }
    }
    (eligible, skipped)
}
