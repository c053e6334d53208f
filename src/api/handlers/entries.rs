//! Entry handlers: listing, filtering and the add/edit/delete forms.
//!
//! Mutating routes answer with `302 Found` and queue a flash notice; the
//! page that follows the redirect shows it.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use maud::Markup;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::api::{ApiError, AppState, flash, pages};
use crate::db::{Database, EntryRepository, NewEntry};

// =============================================================================
// Form and query payloads
// =============================================================================

/// Fields of the add form. All three are required.
#[derive(Debug, Deserialize)]
pub struct EntryForm {
    pub title: String,
    pub text: String,
    pub category: String,
}

impl From<EntryForm> for NewEntry {
    fn from(form: EntryForm) -> Self {
        NewEntry::new(form.title, form.text, form.category)
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub delete: i64,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub edit: i64,
}

#[derive(Debug, Deserialize)]
pub struct EditSuccessForm {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub category: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Local path of the page that submitted the request.
///
/// Only the path and query of the `Referer` header are used, so the
/// redirect never leaves this site. Anything else falls back to `/`, as do
/// paths containing a backslash, which browsers read as `/` and would turn
/// `/\host` into a protocol-relative URL.
fn referer_target(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|target| {
            target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
        })
        .unwrap_or_else(|| "/".to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /` - all entries plus the distinct categories.
#[instrument(skip_all)]
pub async fn show_entries<D: Database>(
    State(state): State<AppState<D>>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Markup), ApiError> {
    let repo = state.db().entries();
    let entries = repo.list().await?;
    let categories = repo.categories().await?;

    let (jar, messages) = flash::take(jar);
    Ok((
        jar,
        pages::listing(&entries, Some(categories.as_slice()), &messages),
    ))
}

/// `POST /add`
#[instrument(skip_all)]
pub async fn add_entry<D: Database>(
    State(state): State<AppState<D>>,
    jar: SignedCookieJar,
    form: Result<Form<EntryForm>, FormRejection>,
) -> Result<(SignedCookieJar, Response), ApiError> {
    let Form(form) = form?;

    let id = state.db().entries().create(&NewEntry::from(form)).await?;
    info!(id, "entry created");

    Ok((
        flash::push(jar, "New entry was successfully posted"),
        found("/"),
    ))
}

/// `GET /filter?filter=<category>`
///
/// An empty category is the unfiltered listing, so it redirects there.
#[instrument(skip_all)]
pub async fn filter_entries<D: Database>(
    State(state): State<AppState<D>>,
    jar: SignedCookieJar,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(FilterQuery { filter }) = query?;
    if filter.is_empty() {
        return Ok(found("/"));
    }

    let entries = state.db().entries().list_by_category(&filter).await?;
    debug!(category = %filter, count = entries.len(), "filtered entries");

    let (jar, mut messages) = flash::take(jar);
    messages.push(format!(
        "Entries successfully filtered by category: {}",
        filter
    ));

    Ok((jar, pages::listing(&entries, None, &messages)).into_response())
}

/// `POST /delete` - back to whichever page issued the request.
#[instrument(skip_all)]
pub async fn delete_entry<D: Database>(
    State(state): State<AppState<D>>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> Result<(SignedCookieJar, Response), ApiError> {
    let Form(DeleteForm { delete: id }) = form?;

    if state.db().entries().delete(id).await? {
        info!(id, "entry deleted");
    } else {
        debug!(id, "delete of unknown entry ignored");
    }

    Ok((
        flash::push(jar, "Entry successfully deleted"),
        found(&referer_target(&headers)),
    ))
}

/// `POST /edit` - the edit form for one entry.
#[instrument(skip_all)]
pub async fn edit_entry<D: Database>(
    State(state): State<AppState<D>>,
    jar: SignedCookieJar,
    form: Result<Form<EditForm>, FormRejection>,
) -> Result<(SignedCookieJar, Markup), ApiError> {
    let Form(EditForm { edit: id }) = form?;

    let entry = state
        .db()
        .entries()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            message: format!("Entry {} does not exist", id),
        })?;

    let (jar, messages) = flash::take(jar);
    Ok((jar, pages::editor(&entry, &messages)))
}

/// `POST /edit-success` - save the edit form.
#[instrument(skip_all)]
pub async fn update_entry<D: Database>(
    State(state): State<AppState<D>>,
    jar: SignedCookieJar,
    form: Result<Form<EditSuccessForm>, FormRejection>,
) -> Result<(SignedCookieJar, Response), ApiError> {
    let Form(form) = form?;
    let fields = NewEntry::new(form.title, form.text, form.category);

    if state.db().entries().update(form.id, &fields).await? {
        info!(id = form.id, "entry updated");
    } else {
        debug!(id = form.id, "update of unknown entry ignored");
    }

    Ok((
        flash::push(jar, "Entry was successfully edited"),
        found("/"),
    ))
}
