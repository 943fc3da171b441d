//! Paginated, filterable, sortable lists.
//!
//! One [`ListController`] drives every list screen. It is parametrized by a
//! [`ListSource`], which knows the endpoint, its filter type, default sort and the
//! listing-error text. The controller owns the query state, builds the exact outbound
//! request and mirrors each accepted response into local state. Requests carry a
//! sequence number; a response older than the latest issued request is dropped.

pub mod filters;
pub mod masks;
mod page;
pub mod screens;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::notify::Toasts;

pub use filters::{classify_owner_search, CarroFilter, MarcaFilter, OwnerSearch, ProprietarioFilter, UsuarioFilter};
pub use page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for SortDirection {
    type Err = ClientError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ClientError::validation("sortDir", format!("direção inválida: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: u32,
    pub size: u32,
    pub sort_field: String,
    pub sort_dir: SortDirection,
}

/// Exactly what goes on the wire for one list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub page: u32,
    pub size: u32,
    pub sort_field: String,
    pub sort_dir: SortDirection,
    /// Only non-empty filters.
    pub filters: Vec<(&'static str, String)>,
}

impl ListRequest {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
            ("sortField".to_string(), self.sort_field.clone()),
            ("sortDir".to_string(), self.sort_dir.as_str().to_string()),
        ];
        out.extend(self.filters.iter().map(|(k, v)| (k.to_string(), v.clone())));
        out
    }
}

/// Entity-specific filter values and their query mapping.
pub trait ListFilter: Clone + Default + fmt::Debug + Send + Sync {
    /// Non-empty filters only, in a stable order.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Parse the interactive `filter ...` syntax.
    fn parse(input: &str) -> ClientResult<Self>;

    fn is_empty(&self) -> bool { self.query_pairs().is_empty() }
}

/// Backend endpoint a list controller reads from.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;
    type Filter: ListFilter;

    const DEFAULT_SORT: &'static str;
    const SORT_FIELDS: &'static [&'static str];
    /// Toast text when a listing call fails.
    const LIST_ERROR: &'static str;

    async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<Self::Item>>;
}

/// Handle for one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub request: ListRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Applied,
    /// A newer request was issued; this response was dropped.
    Stale,
    Failed(ClientError),
}

pub struct ListController<S: ListSource> {
    source: S,
    state: QueryState,
    filter: S::Filter,
    result: Page<S::Item>,
    issued: u64,
    loaded: bool,
    toasts: Option<Toasts>,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, size: u32) -> Self {
        Self {
            source,
            state: QueryState { page: 0, size: size.max(1), sort_field: S::DEFAULT_SORT.to_string(), sort_dir: SortDirection::Asc },
            filter: S::Filter::default(),
            result: Page::default(),
            issued: 0,
            loaded: false,
            toasts: None,
        }
    }

    pub fn with_toasts(mut self, toasts: Toasts) -> Self {
        self.toasts = Some(toasts);
        self
    }

    /// Start from a non-default sort without issuing a request.
    pub fn with_sort(mut self, field: &str, dir: SortDirection) -> ClientResult<Self> {
        Self::check_field(field)?;
        self.state.sort_field = field.to_string();
        self.state.sort_dir = dir;
        Ok(self)
    }

    pub fn with_filter(mut self, filter: S::Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Start on page `n` (0-based); the range is only known after the first response.
    pub fn with_page(mut self, n: u32) -> Self {
        self.state.page = n;
        self
    }

    pub fn source(&self) -> &S { &self.source }

    pub fn state(&self) -> &QueryState { &self.state }

    pub fn filter(&self) -> &S::Filter { &self.filter }

    pub fn result(&self) -> &Page<S::Item> { &self.result }

    pub fn content(&self) -> &[S::Item] { &self.result.content }

    pub fn page(&self) -> u32 { self.state.page }

    pub fn total_pages(&self) -> u32 { self.result.total_pages }

    pub fn total_elements(&self) -> u64 { self.result.total_elements }

    /// Whether any response has been applied yet.
    pub fn is_loaded(&self) -> bool { self.loaded }

    pub fn request(&self) -> ListRequest {
        ListRequest {
            page: self.state.page,
            size: self.state.size,
            sort_field: self.state.sort_field.clone(),
            sort_dir: self.state.sort_dir,
            filters: self.filter.query_pairs(),
        }
    }

    /// Issue a new request number for the current state. Every earlier ticket becomes stale.
    pub fn begin_query(&mut self) -> QueryTicket {
        self.issued += 1;
        let ticket = QueryTicket { seq: self.issued, request: self.request() };
        debug!(target: "carro_admin::listing", seq = ticket.seq, request = ?ticket.request, "list query issued");
        ticket
    }

    /// Merge a response for `ticket`. Failures leave the current page untouched and raise
    /// the listing-error toast.
    pub fn apply_result(&mut self, ticket: &QueryTicket, result: ClientResult<Page<S::Item>>) -> QueryOutcome {
        if ticket.seq < self.issued {
            debug!(target: "carro_admin::listing", seq = ticket.seq, latest = self.issued, "stale response dropped");
            return QueryOutcome::Stale;
        }
        match result {
            Ok(page) => {
                self.state.page = page.number;
                self.result = page;
                self.loaded = true;
                QueryOutcome::Applied
            }
            Err(e) => {
                warn!(target: "carro_admin::listing", seq = ticket.seq, error = %e, "list query failed");
                if let Some(t) = &self.toasts {
                    t.error(S::LIST_ERROR);
                }
                QueryOutcome::Failed(e)
            }
        }
    }

    pub async fn execute_query(&mut self) -> ClientResult<()> {
        let ticket = self.begin_query();
        let result = self.source.fetch(&ticket.request).await;
        match self.apply_result(&ticket, result) {
            QueryOutcome::Failed(e) => Err(e),
            QueryOutcome::Applied | QueryOutcome::Stale => Ok(()),
        }
    }

    /// Jump to page `n` (0-based). Page 0 is always reachable.
    pub async fn set_page(&mut self, n: u32) -> ClientResult<()> {
        if n != 0 && n >= self.result.total_pages {
            return Err(ClientError::validation(
                "page",
                format!("página {} fora do intervalo (total {})", n, self.result.total_pages),
            ));
        }
        self.state.page = n;
        self.execute_query().await
    }

    /// No-op on the last page.
    pub async fn next_page(&mut self) -> ClientResult<()> {
        let next = self.state.page.saturating_add(1);
        if next < self.result.total_pages {
            self.set_page(next).await
        } else {
            Ok(())
        }
    }

    /// No-op on the first page.
    pub async fn previous_page(&mut self) -> ClientResult<()> {
        if self.state.page > 0 {
            self.set_page(self.state.page - 1).await
        } else {
            Ok(())
        }
    }

    pub async fn apply_filter(&mut self, filter: S::Filter) -> ClientResult<()> {
        self.state.page = 0;
        self.filter = filter;
        self.execute_query().await
    }

    pub async fn clear_filter(&mut self) -> ClientResult<()> { self.apply_filter(S::Filter::default()).await }

    /// Same field flips direction, a new field sorts ascending. Always back to page 0.
    pub async fn sort_by(&mut self, field: &str) -> ClientResult<()> {
        Self::check_field(field)?;
        if self.state.sort_field == field {
            self.state.sort_dir = self.state.sort_dir.flipped();
        } else {
            self.state.sort_field = field.to_string();
            self.state.sort_dir = SortDirection::Asc;
        }
        self.state.page = 0;
        self.execute_query().await
    }

    fn check_field(field: &str) -> ClientResult<()> {
        if S::SORT_FIELDS.contains(&field) {
            Ok(())
        } else {
            Err(ClientError::validation(
                "sortField",
                format!("campo de ordenação inválido: {field} (use {})", S::SORT_FIELDS.join(", ")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;

    /// Scripted source: records every request and answers from a queue.
    #[derive(Clone, Default)]
    struct Scripted {
        requests: Arc<Mutex<Vec<ListRequest>>>,
        replies: Arc<Mutex<VecDeque<ClientResult<Page<String>>>>>,
    }

    impl Scripted {
        fn reply(&self, r: ClientResult<Page<String>>) { self.replies.lock().push_back(r); }
        fn last(&self) -> ListRequest { self.requests.lock().last().cloned().unwrap() }
    }

    #[async_trait]
    impl ListSource for Scripted {
        type Item = String;
        type Filter = CarroFilter;
        const DEFAULT_SORT: &'static str = "modelo";
        const SORT_FIELDS: &'static [&'static str] = &["id", "modelo", "ano"];
        const LIST_ERROR: &'static str = "Erro ao listar carros!";

        async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<String>> {
            self.requests.lock().push(request.clone());
            self.replies.lock().pop_front().unwrap_or_else(|| Ok(page(&[], request.page, 10)))
        }
    }

    fn page(items: &[&str], number: u32, total_pages: u32) -> Page<String> {
        Page {
            content: items.iter().map(|s| s.to_string()).collect(),
            number,
            total_pages,
            total_elements: u64::from(total_pages) * 5,
            size: 5,
        }
    }

    #[tokio::test]
    async fn first_request_carries_defaults_and_no_filters() {
        let src = Scripted::default();
        let mut lc = ListController::new(src.clone(), 5);
        lc.execute_query().await.unwrap();
        let pairs = src.last().to_query_pairs();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "size", "sortField", "sortDir"]);
        assert_eq!(pairs[2].1, "modelo");
        assert_eq!(pairs[3].1, "asc");
    }

    #[tokio::test]
    async fn sort_twice_toggles_and_resets_page() {
        let src = Scripted::default();
        let mut lc = ListController::new(src.clone(), 5);
        lc.execute_query().await.unwrap();
        lc.set_page(2).await.unwrap();
        lc.sort_by("ano").await.unwrap();
        assert_eq!((lc.state().sort_dir, lc.page()), (SortDirection::Asc, 0));
        lc.set_page(3).await.unwrap();
        lc.sort_by("ano").await.unwrap();
        assert_eq!(lc.state().sort_dir, SortDirection::Desc);
        assert_eq!(src.last().page, 0);
        lc.sort_by("ano").await.unwrap();
        assert_eq!(lc.state().sort_dir, SortDirection::Asc);
        assert!(lc.sort_by("cor").await.is_err());
    }

    #[tokio::test]
    async fn filter_changes_reset_page() {
        let src = Scripted::default();
        let mut lc = ListController::new(src.clone(), 5);
        lc.execute_query().await.unwrap();
        lc.set_page(3).await.unwrap();
        lc.apply_filter(CarroFilter { modelo: Some("Civic".into()), ..Default::default() }).await.unwrap();
        let req = src.last();
        assert_eq!(req.page, 0);
        assert_eq!(req.filters, vec![("modelo", "Civic".to_string())]);
        lc.set_page(4).await.unwrap();
        lc.clear_filter().await.unwrap();
        assert_eq!(src.last().page, 0);
        assert!(src.last().filters.is_empty());
    }

    #[tokio::test]
    async fn page_bounds() {
        let src = Scripted::default();
        src.reply(Ok(page(&["a"], 0, 2)));
        let mut lc = ListController::new(src.clone(), 5);
        lc.execute_query().await.unwrap();
        assert!(lc.set_page(2).await.is_err());
        lc.previous_page().await.unwrap();
        assert_eq!(src.requests.lock().len(), 1);
        src.reply(Ok(page(&["b"], 1, 2)));
        lc.next_page().await.unwrap();
        assert_eq!(lc.page(), 1);
        lc.next_page().await.unwrap();
        assert_eq!(src.requests.lock().len(), 2);
    }

    #[tokio::test]
    async fn next_page_on_last_representable_page_is_a_no_op() {
        let src = Scripted::default();
        src.reply(Ok(page(&["a"], u32::MAX, u32::MAX)));
        let mut lc = ListController::new(src.clone(), 5);
        lc.execute_query().await.unwrap();
        assert_eq!(lc.page(), u32::MAX);
        lc.next_page().await.unwrap();
        assert_eq!(src.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn failure_keeps_content_and_toasts() {
        let src = Scripted::default();
        src.reply(Ok(page(&["Civic", "Fit"], 0, 1)));
        src.reply(Err(ClientError::unreachable("refused")));
        let toasts = Toasts::new(Duration::ZERO);
        let mut lc = ListController::new(src.clone(), 5).with_toasts(toasts.clone());
        lc.execute_query().await.unwrap();
        let before = lc.result().clone();
        assert!(matches!(lc.execute_query().await, Err(ClientError::Unreachable { .. })));
        assert_eq!(lc.result(), &before);
        let t = toasts.current();
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].message, "Erro ao listar carros!");
    }

    #[test]
    fn stale_tickets_are_dropped() {
        let mut lc = ListController::new(Scripted::default(), 5);
        let first = lc.begin_query();
        let second = lc.begin_query();
        assert_eq!(lc.apply_result(&second, Ok(page(&["new"], 0, 1))), QueryOutcome::Applied);
        assert_eq!(lc.apply_result(&first, Ok(page(&["old"], 0, 1))), QueryOutcome::Stale);
        assert_eq!(lc.apply_result(&first, Err(ClientError::unreachable("x"))), QueryOutcome::Stale);
        assert_eq!(lc.content(), &["new".to_string()]);
    }

    #[test]
    fn with_sort_validates_field() {
        assert!(ListController::new(Scripted::default(), 5).with_sort("nope", SortDirection::Asc).is_err());
        let lc = ListController::new(Scripted::default(), 0).with_sort("id", SortDirection::Desc).unwrap();
        assert_eq!(lc.request().sort_dir, SortDirection::Desc);
        assert_eq!(lc.request().size, 1);
    }
}
