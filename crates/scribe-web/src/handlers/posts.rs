//! Author-scoped post create, update and delete.
//!
//! Every controller here is gated. Update and delete additionally require the
//! caller to own the post; existence is checked first, so a missing slug is
//! a 404 for everyone.

use axum::{
  Form,
  extract::{Path, State},
  response::Response,
};
use chrono::Utc;
use gtmpl::Value;
use scribe_core::{
  form::{FieldErrors, PostInput},
  notice::Level,
  post::{NewPost, Post},
  store::BlogStore,
  user::User,
};

use crate::{
  AppState,
  auth::SignedIn,
  error::Error,
  page,
  routes::Route,
  templates::{Context, View, form_value, post_value},
};

/// Fetch the post at `slug` for modification by `user`.
async fn owned_post<S>(state: &AppState<S>, user: &User, slug: &str) -> Result<Post, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = state
    .store
    .get_post_by_slug(slug)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  if !post.is_authored_by(user.user_id) {
    tracing::warn!(
      post_id = post.post_id,
      user_id = user.user_id,
      "refusing change to another author's post"
    );
    return Err(Error::Forbidden);
  }
  Ok(post)
}

fn post_form(input: &PostInput, errors: &FieldErrors) -> Value {
  let checked = if input.is_checked() { "on" } else { "" };
  form_value(
    &PostInput::FIELDS,
    |field| match field {
      "title" => input.title.clone(),
      "content" => input.content.clone(),
      "is_active" => checked.to_owned(),
      _ => String::new(),
    },
    errors,
  )
}

// ─── Create ──────────────────────────────────────────────────────────────────

pub async fn create_form<S>(
  State(state): State<AppState<S>>,
  SignedIn { visitor, .. }: SignedIn,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let form = post_form(&PostInput::blank(), &FieldErrors::new());
  page::render(&state.templates, visitor, View::PostCreate, Context::new().value("form", form))
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  SignedIn { mut visitor, user }: SignedIn,
  Form(input): Form<PostInput>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let changes = match input.validate() {
    Ok(changes) => changes,
    Err(errors) => {
      visitor.notify(
        Level::Warning,
        "Your post could not be created. Please correct the errors below.",
      );
      let form = post_form(&input, &errors);
      return page::render(
        &state.templates,
        visitor,
        View::PostCreate,
        Context::new().value("form", form),
      );
    }
  };

  let post = state
    .store
    .create_post(NewPost {
      title:        changes.title,
      content:      changes.content,
      is_active:    changes.is_active,
      author_id:    user.user_id,
      published_at: Utc::now().date_naive(),
    })
    .await
    .map_err(Error::store)?;

  tracing::info!(post_id = post.post_id, slug = %post.slug, "created post");
  visitor.notify(Level::Success, "Post successfully created");
  page::redirect(visitor, Route::Home)
}

// ─── Update ──────────────────────────────────────────────────────────────────

pub async fn update_form<S>(
  State(state): State<AppState<S>>,
  SignedIn { visitor, user }: SignedIn,
  Path(slug): Path<String>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = owned_post(&state, &user, &slug).await?;
  let context = Context::new()
    .value("post", post_value(&post))
    .value("form", post_form(&PostInput::from_post(&post), &FieldErrors::new()));
  page::render(&state.templates, visitor, View::PostUpdate, context)
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  SignedIn { mut visitor, user }: SignedIn,
  Path(slug): Path<String>,
  Form(input): Form<PostInput>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = owned_post(&state, &user, &slug).await?;

  let changes = match input.validate() {
    Ok(changes) => changes,
    Err(errors) => {
      visitor.notify(Level::Error, "Your post is not valid!");
      let context = Context::new()
        .value("post", post_value(&post))
        .value("form", post_form(&input, &errors));
      return page::render(&state.templates, visitor, View::PostUpdate, context);
    }
  };

  state
    .store
    .update_post(post.post_id, changes)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  tracing::info!(post_id = post.post_id, "updated post");
  visitor.notify(Level::Success, "Post successfully updated");
  page::redirect(visitor, Route::Profile)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

pub async fn delete_confirm<S>(
  State(state): State<AppState<S>>,
  SignedIn { visitor, user }: SignedIn,
  Path(slug): Path<String>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = owned_post(&state, &user, &slug).await?;
  page::render(
    &state.templates,
    visitor,
    View::PostDelete,
    Context::new().value("post", post_value(&post)),
  )
}

pub async fn delete<S>(
  State(state): State<AppState<S>>,
  SignedIn { mut visitor, user }: SignedIn,
  Path(slug): Path<String>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = owned_post(&state, &user, &slug).await?;
  if !state.store.delete_post(post.post_id).await.map_err(Error::store)? {
    return Err(Error::NotFound);
  }

  tracing::info!(post_id = post.post_id, slug = %post.slug, "deleted post");
  visitor.notify(Level::Success, "Post successfully deleted");
  page::redirect(visitor, Route::Profile)
}
