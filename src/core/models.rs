//! Domain entities.

/// A catalog movie. Values are replaced, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Relative path as served by the API until a use case completes it.
    pub poster_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: i32,
}

/// One page of results together with the server's page count.
#[derive(Debug, Clone, PartialEq)]
pub struct PagingData<T> {
    pub data: Vec<T>,
    pub total_pages: i32,
}

impl<T> PagingData<T> {
    pub fn new(data: Vec<T>, total_pages: i32) -> Self {
        Self { data, total_pages }
    }

    /// Transforms every item while keeping `total_pages` as reported by the server.
    pub fn map<U, F>(self, f: F) -> PagingData<U>
    where
        F: FnMut(T) -> U,
    {
        PagingData {
            data: self.data.into_iter().map(f).collect(),
            total_pages: self.total_pages,
        }
    }
}
