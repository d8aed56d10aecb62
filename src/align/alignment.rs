use std::ops::Range;

use crate::index::trie::PatternId;

/// 一次匹配结果：模式 `pattern` 与文本 `text` 自 `start` 起对齐，累计替换代价为 `distance`。
///
/// `start` 为有符号数，保持 `position - |P| + 1` 的原始值，不做截断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alignment<'a, S> {
    pub text: &'a [S],
    pub pattern: &'a [S],
    pub pattern_id: PatternId,
    pub start: isize,
    pub distance: u32,
}

impl<'a, S> Alignment<'a, S> {
    pub fn new(
        text: &'a [S],
        pattern: &'a [S],
        pattern_id: PatternId,
        start: isize,
        distance: u32,
    ) -> Self {
        Self { text, pattern, pattern_id, start, distance }
    }

    /// 文本上的结束位置（不含）
    pub fn end(&self) -> isize {
        self.start + self.pattern.len() as isize
    }

    /// 对应的文本区间；起点为负或越过文本末尾时返回 None
    pub fn text_range(&self) -> Option<Range<usize>> {
        let start = usize::try_from(self.start).ok()?;
        let end = start + self.pattern.len();
        (end <= self.text.len()).then_some(start..end)
    }

    /// 与文本无关的比较键 (pattern_id, start, distance)
    pub fn key(&self) -> (PatternId, isize, u32) {
        (self.pattern_id, self.start, self.distance)
    }
}
