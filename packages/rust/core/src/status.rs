//! Conversion states and the user-facing status labels shown by the shells.

use std::fmt;

/// Shown when a shell starts.
pub const READY_LABEL: &str = "就绪 - 输入XML内容并转换为Tavo格式";

/// Shown after the shell clears input and output.
pub const CLEARED_LABEL: &str = "已清空";

/// Shown after the sample input is loaded.
pub const EXAMPLE_LOADED_LABEL: &str = "示例已加载";

/// Summary shown once a result has been displayed.
pub fn completion_label(entry_count: usize) -> String {
    format!("转换完成! 共{entry_count}个条目")
}

/// Lifecycle of a single conversion request.
///
/// `Idle → Parsing → Formatting → Done`, or `Failed` from either working state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionState {
    #[default]
    Idle,
    Parsing,
    Formatting,
    Done,
    Failed,
}

impl ConversionState {
    /// Short label reported to the caller on entering this state.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "就绪",
            Self::Parsing => "解析XML内容...",
            Self::Formatting => "生成Tavo JSON...",
            Self::Done => "转换完成!",
            Self::Failed => "转换出错",
        }
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
