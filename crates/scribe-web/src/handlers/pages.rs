//! Read-only pages: the home listing, about, post detail and profile.

use axum::{
  extract::{Path, Query, State},
  response::Response,
};
use scribe_core::{
  pagination::{Page, PageRequest},
  post::PostQuery,
  store::BlogStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::SignedIn,
  error::Error,
  page,
  templates::{Context, View, post_value, posts_value},
  visitor::Visitor,
};

/// Raw `?page=&size=`. Kept as strings so that malformed values reach the
/// pagination policy instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
  pub page: Option<String>,
  pub size: Option<String>,
}

pub async fn home<S>(
  State(state): State<AppState<S>>,
  visitor: Visitor,
  Query(params): Query<HomeParams>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let request = PageRequest::parse(
    params.page.as_deref(),
    params.size.as_deref(),
    state.config.page_size,
    state.config.max_page_size,
  )?;

  let mut query = PostQuery::feed(visitor.user_id());
  let total = state.store.count_posts(&query).await.map_err(Error::store)?;
  let bounds = request.locate(total)?;
  query.limit = Some(bounds.limit);
  query.offset = Some(bounds.offset);
  let posts = state.store.list_posts(&query).await.map_err(Error::store)?;
  let listing = Page::new(posts, bounds);

  let number_or_blank = |n: Option<usize>| n.map(|n| n.to_string()).unwrap_or_default();
  let context = Context::new()
    .value("posts", posts_value(&listing.items))
    .text("page_number", &listing.number.to_string())
    .text("last_page", &listing.last.to_string())
    .text("previous", &number_or_blank(listing.previous()))
    .text("next", &number_or_blank(listing.next()))
    .text("size", &request.size.to_string());
  page::render(&state.templates, visitor, View::Home, context)
}

pub async fn about<S>(
  State(state): State<AppState<S>>,
  visitor: Visitor,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  page::render(&state.templates, visitor, View::About, Context::new())
}

/// Any post, active or not, is reachable by its slug.
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  visitor: Visitor,
  Path(slug): Path<String>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = state
    .store
    .get_post_by_slug(&slug)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let is_author = visitor.user_id().is_some_and(|id| post.is_authored_by(id));
  let context = Context::new()
    .value("post", post_value(&post))
    .flag("is_author", is_author);
  page::render(&state.templates, visitor, View::PostDetail, context)
}

pub async fn profile<S>(
  State(state): State<AppState<S>>,
  SignedIn { visitor, user }: SignedIn,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let posts = state
    .store
    .list_posts(&PostQuery::by_author(user.user_id))
    .await
    .map_err(Error::store)?;
  page::render(
    &state.templates,
    visitor,
    View::Profile,
    Context::new().value("posts", posts_value(&posts)),
  )
}
