use tokio::sync::watch;

/// 默认断点（像素）
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;

/// 视口宽度
///
/// 唯一的写入方是 `resize`，读取方通过 `subscribe` 得到的监听器读取。
/// 监听器被 drop 时自动注销。
#[derive(Debug)]
pub struct Viewport {
    width: watch::Sender<u32>,
    breakpoint: u32,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self::with_breakpoint(width, DEFAULT_MOBILE_BREAKPOINT)
    }

    pub fn with_breakpoint(width: u32, breakpoint: u32) -> Self {
        let (width, _) = watch::channel(width);
        Self { width, breakpoint }
    }

    /// 处理一次 resize 事件
    pub fn resize(&self, width: u32) {
        let previous = self.width.send_replace(width);
        if is_mobile_width(previous, self.breakpoint) != is_mobile_width(width, self.breakpoint) {
            tracing::debug!("Viewport {} -> {}, mobile: {}", previous, width, self.is_mobile());
        }
    }

    pub fn width(&self) -> u32 {
        *self.width.borrow()
    }

    pub fn is_mobile(&self) -> bool {
        is_mobile_width(self.width(), self.breakpoint)
    }

    pub fn subscribe(&self) -> ViewportListener {
        ViewportListener {
            width: self.width.subscribe(),
            breakpoint: self.breakpoint,
        }
    }

    /// 当前注册的监听器数量
    pub fn listener_count(&self) -> usize {
        self.width.receiver_count()
    }
}

/// 视口监听器（只读）
#[derive(Debug, Clone)]
pub struct ViewportListener {
    width: watch::Receiver<u32>,
    breakpoint: u32,
}

impl ViewportListener {
    /// 不随视口变化的固定宽度，用于一次性渲染
    pub fn fixed(width: u32, breakpoint: u32) -> Self {
        let (_, width) = watch::channel(width);
        Self { width, breakpoint }
    }

    pub fn width(&self) -> u32 {
        *self.width.borrow()
    }

    pub fn is_mobile(&self) -> bool {
        is_mobile_width(self.width(), self.breakpoint)
    }

    /// 等待下一次 resize；视口已销毁时返回 `None`
    pub async fn changed(&mut self) -> Option<bool> {
        self.width.changed().await.ok()?;
        Some(self.is_mobile())
    }
}

fn is_mobile_width(width: u32, breakpoint: u32) -> bool {
    width <= breakpoint
}
