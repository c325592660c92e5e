//! Paginated sign-in fetch
//!
//! Walks the signIns collection page by page, following the continuation
//! cursor until the service stops returning one. A failed page aborts the
//! whole fetch; nothing already fetched is returned.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{AuditError, AuditResult};
use crate::models::{DateRange, RawSignIn, SignInPage};

/// What to fetch
#[derive(Debug, Clone)]
pub struct SignInQuery {
    pub app_id: Uuid,
    pub range: DateRange,
    pub page_size: u32,
}

impl SignInQuery {
    pub fn new(app_id: Uuid, range: DateRange, page_size: u32) -> Self {
        Self {
            app_id,
            range,
            page_size,
        }
    }

    /// OData `$filter` expression for this query
    pub fn filter_expression(&self) -> String {
        format!(
            "appId eq '{}' and createdDateTime ge {} and createdDateTime le {}",
            self.app_id,
            self.range.start_literal(),
            self.range.end_literal()
        )
    }
}

/// Transport for sign-in pages
pub trait SignInSource {
    /// Request the first page of a query
    fn first_page(&self, query: &SignInQuery) -> AuditResult<SignInPage>;

    /// Request the page a continuation cursor points at
    fn next_page(&self, next_link: &str) -> AuditResult<SignInPage>;
}

/// Fetch every sign-in matching `query`
///
/// Records the service returns outside the requested range are dropped, so
/// every returned record falls on a day within `query.range`.
pub fn fetch_sign_ins<S: SignInSource + ?Sized>(
    source: &S,
    query: &SignInQuery,
) -> AuditResult<Vec<RawSignIn>> {
    if query.range.is_empty() {
        tracing::info!(range = %query.range, "Start date is after end date; nothing to fetch");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut pages = 1usize;
    let mut visited = HashSet::new();

    let mut page = source.first_page(query)?;
    loop {
        let SignInPage { value, next_link } = page;
        tracing::debug!(page = pages, records = value.len(), "Fetched sign-in page");

        for raw in value {
            if query.range.contains(&raw.created_date_time) {
                records.push(raw);
            } else {
                dropped += 1;
            }
        }

        let Some(link) = next_link else {
            break;
        };

        // Any cursor seen before means the service is cycling
        if !visited.insert(link.clone()) {
            return Err(AuditError::Fetch(format!(
                "Continuation cursor repeated after page {}",
                pages
            )));
        }

        page = source.next_page(&link)?;
        pages += 1;
    }

    if dropped > 0 {
        tracing::warn!(dropped, range = %query.range, "Dropped sign-ins outside the requested range");
    }
    tracing::info!(pages, records = records.len(), "Sign-in fetch complete");

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Replays canned pages and records what was requested
    struct FakeSource {
        pages: RefCell<VecDeque<AuditResult<SignInPage>>>,
        requested_links: RefCell<Vec<String>>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new(pages: Vec<AuditResult<SignInPage>>) -> Self {
            Self {
                pages: RefCell::new(pages.into()),
                requested_links: RefCell::new(Vec::new()),
                calls: Cell::new(0),
            }
        }

        fn pop(&self) -> AuditResult<SignInPage> {
            self.calls.set(self.calls.get() + 1);
            self.pages
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(SignInPage::default()))
        }
    }

    impl SignInSource for FakeSource {
        fn first_page(&self, _query: &SignInQuery) -> AuditResult<SignInPage> {
            self.pop()
        }

        fn next_page(&self, next_link: &str) -> AuditResult<SignInPage> {
            self.requested_links.borrow_mut().push(next_link.to_string());
            self.pop()
        }
    }

    fn raw(user: &str, day: u32) -> RawSignIn {
        RawSignIn {
            id: None,
            created_date_time: Utc.with_ymd_and_hms(2025, 1, day, 9, 30, 0).unwrap(),
            user_principal_name: Some(user.to_string()),
            app_display_name: None,
            app_id: None,
            ip_address: None,
            correlation_id: None,
            risk_level_during_sign_in: None,
            status: None,
            location: None,
        }
    }

    fn page(records: Vec<RawSignIn>, next: Option<&str>) -> AuditResult<SignInPage> {
        Ok(SignInPage {
            value: records,
            next_link: next.map(str::to_string),
        })
    }

    fn query(start_day: u32, end_day: u32) -> SignInQuery {
        SignInQuery::new(
            Uuid::parse_str("1b730954-1685-4b74-9bfd-dac224a7b894").unwrap(),
            DateRange::new(
                NaiveDate::from_ymd_opt(2025, 1, start_day).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, end_day).unwrap(),
            ),
            999,
        )
    }

    #[test]
    fn test_follows_cursor_until_exhausted() {
        let source = FakeSource::new(vec![
            page(vec![raw("a@contoso.com", 2), raw("b@contoso.com", 3)], Some("link-2")),
            page(vec![raw("c@contoso.com", 4)], Some("link-3")),
            page(vec![raw("d@contoso.com", 5)], None),
        ]);

        let records = fetch_sign_ins(&source, &query(1, 31)).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(source.calls.get(), 3);
        assert_eq!(*source.requested_links.borrow(), vec!["link-2", "link-3"]);
    }

    #[test]
    fn test_page_failure_aborts_fetch() {
        let source = FakeSource::new(vec![
            page(vec![raw("a@contoso.com", 2)], Some("link-2")),
            Err(AuditError::Fetch("connection reset".into())),
            page(vec![raw("c@contoso.com", 4)], None),
        ]);

        let err = fetch_sign_ins(&source, &query(1, 31)).unwrap_err();

        assert!(err.is_fetch());
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_records_outside_range_dropped() {
        let source = FakeSource::new(vec![page(
            vec![
                raw("early@contoso.com", 4),
                raw("first@contoso.com", 5),
                raw("last@contoso.com", 10),
                raw("late@contoso.com", 11),
            ],
            None,
        )]);
        let q = query(5, 10);

        let records = fetch_sign_ins(&source, &q).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| q.range.contains(&r.created_date_time)));
    }

    #[test]
    fn test_reversed_range_makes_no_request() {
        let source = FakeSource::new(vec![page(vec![raw("a@contoso.com", 2)], None)]);

        let records = fetch_sign_ins(&source, &query(20, 10)).unwrap();

        assert!(records.is_empty());
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn test_repeated_cursor_is_an_error() {
        let source = FakeSource::new(vec![
            page(vec![raw("a@contoso.com", 2)], Some("same")),
            page(vec![raw("b@contoso.com", 3)], Some("same")),
        ]);

        let err = fetch_sign_ins(&source, &query(1, 31)).unwrap_err();
        assert!(err.to_string().contains("repeated"));
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_cursor_cycle_is_an_error() {
        let source = FakeSource::new(vec![
            page(vec![raw("a@contoso.com", 2)], Some("link-a")),
            page(vec![raw("b@contoso.com", 3)], Some("link-b")),
            page(vec![raw("c@contoso.com", 4)], Some("link-a")),
            page(vec![raw("d@contoso.com", 5)], Some("link-b")),
        ]);

        let err = fetch_sign_ins(&source, &query(1, 31)).unwrap_err();

        assert!(err.is_fetch());
        assert!(err.to_string().contains("repeated"));
        assert_eq!(source.calls.get(), 3);
        assert_eq!(*source.requested_links.borrow(), vec!["link-a", "link-b"]);
    }

    #[test]
    fn test_empty_first_page() {
        let source = FakeSource::new(vec![page(Vec::new(), None)]);
        assert!(fetch_sign_ins(&source, &query(1, 31)).unwrap().is_empty());
    }

    #[test]
    fn test_filter_expression() {
        assert_eq!(
            query(1, 31).filter_expression(),
            "appId eq '1b730954-1685-4b74-9bfd-dac224a7b894' and \
             createdDateTime ge 2025-01-01T00:00:00Z and \
             createdDateTime le 2025-01-31T23:59:59Z"
        );
    }
}
