/// What the caller should send to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeCall {
    /// `POST /like`
    Like,
    /// `DELETE /like`
    Unlike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    liked: bool,
    count: u64,
}

/// Optimistic like button.
///
/// The local state flips as soon as the user acts and is rolled back if the request fails. While a request is in flight
/// further toggles are refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeToggle {
    liked: bool,
    count: u64,
    pending: Option<Snapshot>,
}

impl LikeToggle {
    pub fn new(liked: bool, count: u64) -> Self {
        Self {
            liked,
            count,
            pending: None,
        }
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Flips the local state and returns the request to send, or `None` if one is already in flight.
    pub fn toggle(&mut self) -> Option<LikeCall> {
        if self.is_in_flight() {
            return None;
        }

        self.pending = Some(Snapshot {
            liked: self.liked,
            count: self.count,
        });

        if self.liked {
            self.liked = false;
            self.count = self.count.saturating_sub(1);
            Some(LikeCall::Unlike)
        } else {
            self.liked = true;
            self.count += 1;
            Some(LikeCall::Like)
        }
    }

    /// A double tap only ever likes.
    pub fn like(&mut self) -> Option<LikeCall> {
        if self.liked {
            return None;
        }

        self.toggle()
    }

    /// The request went through. The server's count wins when it sent one.
    pub fn succeed(&mut self, server_count: Option<u64>) {
        if self.pending.take().is_none() {
            return;
        }

        if let Some(count) = server_count {
            self.count = count;
        }
    }

    /// The request failed; go back to where we were before the toggle.
    pub fn fail(&mut self) {
        if let Some(Snapshot { liked, count }) = self.pending.take() {
            self.liked = liked;
            self.count = count;
        }
    }
}
