use serde::Serialize;

/// 分页控件显示模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    Desktop,
    /// 窄屏：更少的页码按钮，符号化的上一页/下一页
    Condensed,
}

impl PaginationMode {
    pub fn for_mobile(is_mobile: bool) -> Self {
        if is_mobile {
            PaginationMode::Condensed
        } else {
            PaginationMode::Desktop
        }
    }

    pub fn previous_label(&self) -> &'static str {
        match self {
            PaginationMode::Desktop => "Previous",
            PaginationMode::Condensed => "<",
        }
    }

    pub fn next_label(&self) -> &'static str {
        match self {
            PaginationMode::Desktop => "Next",
            PaginationMode::Condensed => ">",
        }
    }

    /// 首尾始终显示的页数
    pub fn margin_pages(&self) -> u32 {
        match self {
            PaginationMode::Desktop => 2,
            PaginationMode::Condensed => 1,
        }
    }

    /// 当前页附近显示的页数
    pub fn page_range(&self) -> u32 {
        match self {
            PaginationMode::Desktop => 5,
            PaginationMode::Condensed => 3,
        }
    }
}

pub const BREAK_LABEL: &str = "...";

/// 分页控件中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageItem {
    Page {
        /// 从 0 开始，点击时原样回传
        index: u32,
        label: String,
        active: bool,
    },
    Break {
        label: &'static str,
    },
}

/// 分页控件布局
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationLayout {
    pub mode: PaginationMode,
    pub page_count: u32,
    /// 当前页（从 0 开始）
    pub selected: u32,
    pub previous_label: &'static str,
    pub next_label: &'static str,
    pub margin_pages_displayed: u32,
    pub page_range_displayed: u32,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub items: Vec<PageItem>,
}

impl PaginationLayout {
    /// `page` 从 1 开始
    pub fn new(page_count: u32, page: u32, mode: PaginationMode) -> Self {
        let selected = page.saturating_sub(1);
        let items = page_items(
            page_count,
            selected,
            mode.page_range(),
            mode.margin_pages(),
        );

        Self {
            mode,
            page_count,
            selected,
            previous_label: mode.previous_label(),
            next_label: mode.next_label(),
            margin_pages_displayed: mode.margin_pages(),
            page_range_displayed: mode.page_range(),
            previous_disabled: selected == 0,
            next_disabled: selected + 1 >= page_count,
            items,
        }
    }
}

/// 计算要显示的页码与省略号
///
/// 首尾各 `margin` 页始终显示，当前页附近显示 `range` 页的窗口，
/// 其余连续的页折叠为一个省略号。
pub fn page_items(page_count: u32, selected: u32, range: u32, margin: u32) -> Vec<PageItem> {
    if page_count == 0 {
        return Vec::new();
    }

    let last = page_count - 1;
    let selected = selected.min(last);
    let window = if range == 0 {
        None
    } else {
        let mut start = selected.saturating_sub(range / 2);
        let mut end = start.saturating_add(range - 1);
        if end > last {
            end = last;
            start = end.saturating_sub(range - 1);
        }
        Some((start, end))
    };

    // 首尾页与窗口三段可见区间，合并后依次输出，区间之间补省略号
    let mut spans: Vec<(u32, u32)> = Vec::with_capacity(3);
    if margin > 0 {
        spans.push((0, (margin - 1).min(last)));
        spans.push((page_count.saturating_sub(margin), last));
    }
    spans.extend(window);
    spans.sort_unstable();

    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some((_, prev_end)) if start <= prev_end.saturating_add(1) => {
                *prev_end = (*prev_end).max(end);
            }
            _ => merged.push((start, end)),
        }
    }

    let mut items = Vec::new();
    let mut next = 0;
    for (start, end) in merged {
        if start > next {
            items.push(PageItem::Break { label: BREAK_LABEL });
        }
        items.extend((start..=end).map(|index| PageItem::Page {
            index,
            label: (index + 1).to_string(),
            active: index == selected,
        }));
        next = end + 1;
    }
    if next <= last {
        items.push(PageItem::Break { label: BREAK_LABEL });
    }
    items
}
