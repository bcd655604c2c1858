/// Parameters for one ranked-list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankingRequest {
    /// Provider sort key, e.g. `market_cap`
    pub sort: String,
    /// Maximum number of items to return
    pub limit: usize,
}

impl RankingRequest {
    pub fn new(sort: impl Into<String>, limit: usize) -> Self {
        Self {
            sort: sort.into(),
            limit,
        }
    }
}
