use std::fmt;

/// Callback receiving the latest notice after an operation, or `None` once cleared.
pub type NoticeListener = Box<dyn FnMut(Option<&str>)>;

/// Handle returned by [`NoticeBoard::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Latest user-facing message plus the listeners that want every update.
///
/// The presentation layer owns display timing; the board only keeps the most
/// recent message until someone clears it.
#[derive(Default)]
pub struct NoticeBoard {
    latest: Option<String>,
    listeners: Vec<(SubscriptionId, NoticeListener)>,
    next_id: u64,
}

impl NoticeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    /// Drop the latest message and tell every listener it is gone.
    pub fn clear(&mut self) {
        self.latest = None;
        for (_, listener) in &mut self.listeners {
            listener(None);
        }
    }

    pub fn subscribe(&mut self, listener: NoticeListener) -> SubscriptionId {
        self.next_id = self.next_id.saturating_add(1);
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    /// Returns false when the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Record an operation's notice and fan out the latest message.
    /// `None` keeps the previous message.
    pub(crate) fn publish(&mut self, notice: Option<&str>) {
        if let Some(text) = notice {
            self.latest = Some(text.to_string());
        }
        let latest = self.latest.as_deref();
        for (_, listener) in &mut self.listeners {
            listener(latest);
        }
    }
}

impl fmt::Debug for NoticeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoticeBoard")
            .field("latest", &self.latest)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
