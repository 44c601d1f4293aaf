//! Offset/limit normalization shared by list endpoints.

const MAX_LIMIT: u64 = 200;
const DEFAULT_LIMIT: u64 = 50;

/// Raw paging input as it arrives from query parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageRequest {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl PageRequest {
    /// Resolve to a concrete (offset, limit) pair with the limit clamped
    /// to a server-side ceiling.
    pub fn resolve(self) -> (u64, u64) {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (offset, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::PageRequest;

    #[test]
    fn empty_request_uses_defaults() {
        let (offset, limit) = PageRequest::default().resolve();
        assert_eq!(offset, 0);
        assert_eq!(limit, 50);
    }

    #[test]
    fn limit_is_clamped() {
        let (_, limit) = PageRequest { offset: Some(10), limit: Some(10_000) }.resolve();
        assert_eq!(limit, 200);
        let (_, limit) = PageRequest { offset: None, limit: Some(0) }.resolve();
        assert_eq!(limit, 1);
    }
}
