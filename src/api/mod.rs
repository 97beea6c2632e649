//! REST API shared utilities (request payloads, list parameters, pagination)

pub mod auth;
pub mod context;
pub mod health;
pub mod locale;
pub mod translation;

use crate::domain::PageRequest;
use crate::error::{AppError, Result};
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::future::Future;

/// Maximum allowed per_page value for pagination
pub(crate) const MAX_PER_PAGE: i64 = 100;

/// Page size used when `per_page` is absent or unusable
pub(crate) const DEFAULT_PER_PAGE: i64 = 10;

/// Linked pages shown on each side of the current page
const LINK_WINDOW_ON_EACH_SIDE: i64 = 3;

/// Raw request payload as a field map.
///
/// Accepts a JSON object or a form-encoded body. An empty body is an empty
/// map, so missing fields surface as validation errors rather than 400s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(pub Map<String, Value>);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if is_form {
            Ok(Payload(parse_form(&body)))
        } else {
            parse_json_object(&body).map(Payload)
        }
    }
}

fn parse_form(body: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

fn parse_json_object(body: &[u8]) -> Result<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::BadRequest(
            "The request body must be a JSON object.".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!("Malformed JSON body: {}", e))),
    }
}

/// Body of a write to an existing row.
///
/// A rejected body is reported only after `load` confirms the row exists, so a
/// missing id answers 404 whatever was sent.
pub(crate) async fn payload_for<T, F>(
    payload: std::result::Result<Payload, AppError>,
    load: F,
) -> Result<Map<String, Value>>
where
    F: Future<Output = Result<T>>,
{
    match payload {
        Ok(Payload(map)) => Ok(map),
        Err(rejection) => {
            load.await?;
            Err(rejection)
        }
    }
}

/// Resolve a path identity. Anything that is not an integer names no row.
pub(crate) fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| AppError::NotFound)
}

/// Query-string parameters of a list or search request.
///
/// Parsing never fails: unusable `page`/`per_page` values fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

impl ListParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Last value given for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn positive(&self, name: &str) -> Option<i64> {
        self.get(name)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 1)
    }

    pub fn page(&self) -> i64 {
        self.positive("page")
            .map(|v| v.min(PageRequest::last_addressable(self.per_page())))
            .unwrap_or(1)
    }

    pub fn per_page(&self) -> i64 {
        self.positive("per_page")
            .map(|v| v.min(MAX_PER_PAGE))
            .unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page(), self.per_page())
    }

    /// Parameters carried over into page links (everything but `page`)
    fn carried_over(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .filter(|(k, _)| k != "page")
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(ListParams::parse(parts.uri.query()))
    }
}

/// One entry of the paginator's `links` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatorLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

/// Length-aware pagination envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LengthAwarePaginator<T> {
    pub current_page: i64,
    pub data: Vec<T>,
    pub first_page_url: String,
    pub from: Option<i64>,
    pub last_page: i64,
    pub last_page_url: String,
    pub links: Vec<PaginatorLink>,
    pub next_page_url: Option<String>,
    pub path: String,
    pub per_page: i64,
    pub prev_page_url: Option<String>,
    pub to: Option<i64>,
    pub total: i64,
}

impl<T: Serialize> LengthAwarePaginator<T> {
    /// Build the envelope for `data`, one page of `total` matches.
    ///
    /// `path` is the absolute URL of the listing; page links repeat the
    /// request's other query parameters.
    pub fn new(
        data: Vec<T>,
        total: i64,
        page: PageRequest,
        path: String,
        params: &ListParams,
    ) -> Self {
        let per_page = page.per_page;
        let current_page = page.page;
        let last_page = (total / per_page + i64::from(total % per_page != 0)).max(1);

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = page.offset() + 1;
            (Some(from), Some(from + (data.len() as i64 - 1)))
        };

        let carried = params.carried_over();
        let url_for = |n: i64| page_url(&path, &carried, n);

        let prev_page_url = (current_page > 1).then(|| url_for(current_page - 1));
        let next_page_url = (current_page < last_page).then(|| url_for(current_page + 1));

        let mut links = Vec::new();
        links.push(PaginatorLink {
            url: prev_page_url.clone(),
            label: "&laquo; Previous".to_string(),
            active: false,
        });
        for element in link_window(current_page, last_page) {
            links.push(match element {
                Some(n) => PaginatorLink {
                    url: Some(url_for(n)),
                    label: n.to_string(),
                    active: n == current_page,
                },
                None => PaginatorLink {
                    url: None,
                    label: "...".to_string(),
                    active: false,
                },
            });
        }
        links.push(PaginatorLink {
            url: next_page_url.clone(),
            label: "Next &raquo;".to_string(),
            active: false,
        });

        Self {
            current_page,
            data,
            first_page_url: url_for(1),
            from,
            last_page,
            last_page_url: url_for(last_page),
            links,
            next_page_url,
            path,
            per_page,
            prev_page_url,
            to,
            total,
        }
    }
}

fn page_url(path: &str, carried: &[(&str, &str)], page: i64) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.extend_pairs(carried.iter().copied());
    query.append_pair("page", &page.to_string());
    format!("{}?{}", path, query.finish())
}

/// Page numbers to link, with `None` marking an elided gap.
///
/// Small page counts list every page. Otherwise the first and last two pages
/// are kept and a window slides around the current page.
fn link_window(current: i64, last: i64) -> Vec<Option<i64>> {
    let on_each_side = LINK_WINDOW_ON_EACH_SIDE;
    let pages = |from: i64, to: i64| (from..=to).map(Some).collect::<Vec<_>>();

    if last < on_each_side * 2 + 8 {
        return pages(1, last);
    }

    let window = on_each_side + 4;
    let mut elements;
    if current <= window {
        elements = pages(1, window + on_each_side);
        elements.push(None);
        elements.extend(pages(last - 1, last));
    } else if current > last - window {
        elements = pages(1, 2);
        elements.push(None);
        elements.extend(pages(last - (window + on_each_side - 1), last));
    } else {
        elements = pages(1, 2);
        elements.push(None);
        elements.extend(pages(current - on_each_side, current + on_each_side));
        elements.push(None);
        elements.extend(pages(last - 1, last));
    }
    elements
}
