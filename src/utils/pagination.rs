use serde::Deserialize;

pub const DEFAULT_PAGE_LIMIT: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// `?startIndex=&limit=&sort=asc|desc` as sent by the dashboard
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub start_index: Option<u64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub start_index: u64,
    pub limit: i64,
    pub sort: SortDirection,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            start_index: 0,
            limit: DEFAULT_PAGE_LIMIT,
            sort: SortDirection::Desc,
        }
    }
}

impl From<PageQuery> for PageOptions {
    fn from(query: PageQuery) -> Self {
        PageOptions {
            start_index: query.start_index.unwrap_or(0),
            limit: query
                .limit
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT),
            sort: match query.sort.as_deref() {
                Some("asc") => SortDirection::Asc,
                _ => SortDirection::Desc,
            },
        }
    }
}

impl PageOptions {
    /// Slice an already ordered list the way the database would apply skip/limit.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.start_index as usize)
            .take(self.limit.max(0) as usize)
            .collect()
    }

    pub fn mongo_sort(&self) -> i32 {
        match self.sort {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_query_is_empty() {
        let opts = PageOptions::from(PageQuery::default());
        assert_eq!(opts, PageOptions::default());
    }

    #[test]
    fn rejects_non_positive_limit_and_reads_sort() {
        let opts = PageOptions::from(PageQuery {
            start_index: Some(3),
            limit: Some(-1),
            sort: Some("asc".into()),
        });
        assert_eq!(opts.start_index, 3);
        assert_eq!(opts.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(opts.sort, SortDirection::Asc);
        assert_eq!(opts.mongo_sort(), 1);
    }

    #[test]
    fn apply_skips_then_limits() {
        let opts = PageOptions {
            start_index: 2,
            limit: 2,
            sort: SortDirection::Desc,
        };
        assert_eq!(opts.apply(vec![1, 2, 3, 4, 5]), vec![3, 4]);
    }
}
