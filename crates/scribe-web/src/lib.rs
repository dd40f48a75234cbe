//! HTTP layer for scribe.
//!
//! Exposes an axum [`Router`] serving the blog as server-rendered HTML,
//! backed by any [`BlogStore`].

pub mod auth;
pub mod cookie;
pub mod error;
pub mod handlers;
pub mod page;
pub mod routes;
pub mod templates;
pub mod visitor;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use scribe_core::store::BlogStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{account, pages, posts};
use templates::Templates;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SCRIBE_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub database_path:     PathBuf,
  /// Posts per home page when `?size=` is absent.
  pub page_size:         usize,
  /// Largest `?size=` accepted.
  pub max_page_size:     usize,
  pub session_ttl_hours: i64,
  /// Mark cookies `Secure`; enable when served over HTTPS.
  pub secure_cookies:    bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              8000,
      database_path:     PathBuf::from("scribe.db"),
      page_size:         4,
      max_page_size:     100,
      session_ttl_hours: 24 * 14,
      secure_cookies:    false,
    }
  }
}

/// Longest accepted session lifetime: ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

impl ServerConfig {
  /// Reject values the handlers cannot work with.
  pub fn validate(&self) -> anyhow::Result<()> {
    anyhow::ensure!(self.page_size > 0, "page_size must be at least 1");
    anyhow::ensure!(
      self.page_size <= self.max_page_size,
      "page_size ({}) must not exceed max_page_size ({})",
      self.page_size,
      self.max_page_size,
    );
    anyhow::ensure!(
      (1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours),
      "session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}, got {}",
      self.session_ttl_hours,
    );
    Ok(())
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: BlogStore> {
  pub store:     Arc<S>,
  pub config:    Arc<ServerConfig>,
  pub templates: Arc<Templates>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the blog.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/",                   get(pages::home::<S>))
    .route("/about",              get(pages::about::<S>))
    .route("/register",           get(account::register_form::<S>).post(account::register::<S>))
    .route("/login",              get(account::login_form::<S>).post(account::login::<S>))
    .route("/logout",             get(account::logout_confirm::<S>).post(account::logout::<S>))
    .route("/profile",            get(pages::profile::<S>))
    .route("/create",             get(posts::create_form::<S>).post(posts::create::<S>))
    .route("/post/{slug}",        get(pages::detail::<S>))
    .route("/post/{slug}/update", get(posts::update_form::<S>).post(posts::update::<S>))
    .route("/post/{slug}/delete", get(posts::delete_confirm::<S>).post(posts::delete::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use chrono::{Duration, NaiveDate, Utc};
  use scribe_core::{
    post::{NewPost, Post, PostQuery},
    user::{NewUser, User},
  };
  use scribe_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use crate::{
    auth::{hash_password, new_session_token, token_digest},
    cookie::{NOTICE_COOKIE, SESSION_COOKIE},
    visitor::FRAGMENT_HEADER,
  };

  async fn make_state() -> AppState<SqliteStore> {
    make_state_with(ServerConfig::default()).await
  }

  async fn make_state_with(config: ServerConfig) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:     Arc::new(store),
      config:    Arc::new(config),
      templates: Arc::new(Templates::load().unwrap()),
    }
  }

  /// A user with an unusable password hash; tests that log in through the
  /// form use [`user_with_password`] instead.
  async fn user(state: &AppState<SqliteStore>, username: &str) -> User {
    state
      .store
      .create_user(NewUser {
        username:      username.to_string(),
        email:         format!("{username}@example.com"),
        password_hash: "!".to_string(),
      })
      .await
      .unwrap()
      .unwrap()
  }

  async fn user_with_password(
    state: &AppState<SqliteStore>,
    username: &str,
    password: &str,
  ) -> User {
    state
      .store
      .create_user(NewUser {
        username:      username.to_string(),
        email:         format!("{username}@example.com"),
        password_hash: hash_password(password).unwrap(),
      })
      .await
      .unwrap()
      .unwrap()
  }

  /// Open a session for `user` directly in the store; returns the `Cookie`
  /// header value that presents it.
  async fn session_cookie(state: &AppState<SqliteStore>, user: &User) -> String {
    let token = new_session_token();
    state
      .store
      .create_session(token_digest(&token), user.user_id, Utc::now() + Duration::hours(1))
      .await
      .unwrap();
    format!("{SESSION_COOKIE}={token}")
  }

  async fn post(state: &AppState<SqliteStore>, author: &User, title: &str, active: bool) -> Post {
    state
      .store
      .create_post(NewPost {
        title:        title.to_string(),
        content:      format!("Body of {title}"),
        is_active:    active,
        author_id:    author.user_id,
        published_at: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      })
      .await
      .unwrap()
  }

  fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
      builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).unwrap()
  }

  fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
      builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).unwrap()
  }

  async fn send(state: &AppState<SqliteStore>, req: Request<Body>) -> Response {
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn location(resp: &Response) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
  }

  /// `name=value` of the cookie `name` set by `resp`, if any.
  fn set_cookie(resp: &Response, name: &str) -> Option<String> {
    resp
      .headers()
      .get_all(header::SET_COOKIE)
      .iter()
      .filter_map(|v| v.to_str().ok())
      .find(|v| v.starts_with(&format!("{name}=")))
      .and_then(|v| v.split(';').next())
      .map(str::to_string)
  }

  // ── Authorization gate ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn gated_routes_redirect_anonymous_visitors_without_mutation() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let original = post(&state, &alice, "Mine", true).await;

    let requests = [
      get("/profile", None),
      get("/create", None),
      post_form("/create", None, "title=Sneaky&content=x&is_active=on"),
      get("/post/mine/update", None),
      post_form("/post/mine/update", None, "title=Changed&content=x"),
      get("/post/mine/delete", None),
      post_form("/post/mine/delete", None, ""),
    ];
    for req in requests {
      let uri = req.uri().to_string();
      let resp = send(&state, req).await;
      assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
      assert_eq!(location(&resp), "/login", "{uri}");
    }

    let all = state.store.list_posts(&PostQuery::default()).await.unwrap();
    assert_eq!(all, vec![original]);
  }

  #[tokio::test]
  async fn expired_session_is_treated_as_anonymous() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let token = new_session_token();
    state
      .store
      .create_session(token_digest(&token), alice.user_id, Utc::now() - Duration::minutes(1))
      .await
      .unwrap();

    let resp = send(&state, get("/profile", Some(&format!("{SESSION_COOKIE}={token}")))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
  }

  #[tokio::test]
  async fn non_owner_is_forbidden_and_nothing_changes() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    let original = post(&state, &alice, "Alice only", true).await;
    let bob_cookie = session_cookie(&state, &bob).await;

    let requests = [
      get("/post/alice-only/update", Some(&bob_cookie)),
      post_form("/post/alice-only/update", Some(&bob_cookie), "title=Hijacked&content=x"),
      get("/post/alice-only/delete", Some(&bob_cookie)),
      post_form("/post/alice-only/delete", Some(&bob_cookie), ""),
    ];
    for req in requests {
      let uri = req.uri().to_string();
      assert_eq!(send(&state, req).await.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let stored = state.store.get_post_by_slug("alice-only").await.unwrap();
    assert_eq!(stored, Some(original));
  }

  #[tokio::test]
  async fn missing_post_is_not_found_before_ownership() {
    let state = make_state().await;
    let bob = user(&state, "bob").await;
    let cookie = session_cookie(&state, &bob).await;

    let resp = send(&state, get("/post/nope/update", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = send(&state, post_form("/post/nope/delete", Some(&cookie), "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Posts ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_round_trip() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let cookie = session_cookie(&state, &alice).await;

    let resp = send(
      &state,
      post_form("/create", Some(&cookie), "title=Hello+World&content=First+post&is_active=on"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert!(set_cookie(&resp, NOTICE_COOKIE).is_some());

    let created = state.store.get_post_by_slug("hello-world").await.unwrap().unwrap();
    assert_eq!(created.title, "Hello World");
    assert_eq!(created.content, "First post");
    assert_eq!(created.author_id, alice.user_id);
    assert!(created.is_active);
    assert_eq!(created.published_at, Utc::now().date_naive());
  }

  #[tokio::test]
  async fn unchecked_box_creates_inactive_post() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let cookie = session_cookie(&state, &alice).await;

    send(&state, post_form("/create", Some(&cookie), "title=Draft&content=later")).await;
    let created = state.store.get_post_by_slug("draft").await.unwrap().unwrap();
    assert!(!created.is_active);
  }

  #[tokio::test]
  async fn invalid_create_rerenders_and_persists_nothing() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let cookie = session_cookie(&state, &alice).await;

    let resp = send(&state, post_form("/create", Some(&cookie), "title=&content=kept+text")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains("kept text"));
    assert!(html.contains("notice-warning"));

    assert_eq!(state.store.count_posts(&PostQuery::default()).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn owner_updates_editable_fields_only() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let cookie = session_cookie(&state, &alice).await;
    let original = post(&state, &alice, "First title", true).await;

    let form = send(&state, get("/post/first-title/update", Some(&cookie))).await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(body_text(form).await.contains(r#"value="First title""#));

    let resp = send(
      &state,
      post_form("/post/first-title/update", Some(&cookie), "title=Second+title&content=New"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/profile");

    let updated = state.store.get_post_by_slug("first-title").await.unwrap().unwrap();
    assert_eq!(updated.title, "Second title");
    assert_eq!(updated.content, "New");
    assert!(!updated.is_active);
    assert_eq!(updated.post_id, original.post_id);
    assert_eq!(updated.published_at, original.published_at);
  }

  #[tokio::test]
  async fn invalid_update_reports_error_and_keeps_post() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let cookie = session_cookie(&state, &alice).await;
    let original = post(&state, &alice, "Stable", true).await;

    let resp = send(&state, post_form("/post/stable/update", Some(&cookie), "title=&content=")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Your post is not valid!"));
    assert!(html.contains("notice-error"));

    let stored = state.store.get_post_by_slug("stable").await.unwrap();
    assert_eq!(stored, Some(original));
  }

  #[tokio::test]
  async fn deleting_twice_is_not_found() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let cookie = session_cookie(&state, &alice).await;
    post(&state, &alice, "Short lived", true).await;

    let confirm = send(&state, get("/post/short-lived/delete", Some(&cookie))).await;
    assert_eq!(confirm.status(), StatusCode::OK);

    let first = send(&state, post_form("/post/short-lived/delete", Some(&cookie), "")).await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&first), "/profile");

    let second = send(&state, post_form("/post/short-lived/delete", Some(&cookie), "")).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    let detail = send(&state, get("/post/short-lived", None)).await;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
  }

  // ── Listing and pages ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn home_excludes_own_and_inactive_posts() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    post(&state, &alice, "Alice writes", true).await;
    post(&state, &bob, "Bob writes", true).await;
    post(&state, &bob, "Bob hides", false).await;

    let html = body_text(send(&state, get("/", None)).await).await;
    assert!(html.contains("Alice writes"));
    assert!(html.contains("Bob writes"));
    assert!(!html.contains("Bob hides"));

    let cookie = session_cookie(&state, &alice).await;
    let html = body_text(send(&state, get("/", Some(&cookie))).await).await;
    assert!(!html.contains("Alice writes"));
    assert!(html.contains("Bob writes"));
  }

  #[tokio::test]
  async fn home_paginates_in_creation_order() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    for i in 1..=5 {
      post(&state, &alice, &format!("Entry {i}"), true).await;
    }

    let first = body_text(send(&state, get("/?size=2", None)).await).await;
    assert!(first.contains("Entry 1") && first.contains("Entry 2"));
    assert!(!first.contains("Entry 3"));
    assert!(first.contains("Page 1 of 3"));

    let last = body_text(send(&state, get("/?page=3&size=2", None)).await).await;
    assert!(last.contains("Entry 5"));
    assert!(!last.contains("Entry 4"));
  }

  #[tokio::test]
  async fn invalid_pages_are_not_found() {
    let state = make_state().await;
    for uri in ["/?page=0", "/?page=abc", "/?page=2", "/?size=0", "/?size=101", "/?page=-1"] {
      assert_eq!(send(&state, get(uri, None)).await.status(), StatusCode::NOT_FOUND, "{uri}");
    }
    for uri in ["/", "/?page=1", "/?page=1&size=100"] {
      assert_eq!(send(&state, get(uri, None)).await.status(), StatusCode::OK, "{uri}");
    }
  }

  #[tokio::test]
  async fn fragment_requests_skip_the_shell() {
    let state = make_state().await;

    let full = send(&state, get("/about", None)).await;
    assert_eq!(full.headers()[header::VARY], FRAGMENT_HEADER);
    let html = body_text(full).await;
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains(r#"data-template="blog/about.html""#));

    let req = Request::builder()
      .uri("/about")
      .header(FRAGMENT_HEADER, "true")
      .body(Body::empty())
      .unwrap();
    let html = body_text(send(&state, req).await).await;
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(html.contains("About this blog"));
  }

  #[tokio::test]
  async fn detail_shows_any_post_and_author_links() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    post(&state, &alice, "Hidden gem", false).await;

    let resp = send(&state, get("/post/hidden-gem", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Body of Hidden gem"));
    assert!(!html.contains("/post/hidden-gem/update"));

    let cookie = session_cookie(&state, &alice).await;
    let html = body_text(send(&state, get("/post/hidden-gem", Some(&cookie))).await).await;
    assert!(html.contains("/post/hidden-gem/update"));
  }

  #[tokio::test]
  async fn unknown_slug_is_not_found() {
    let state = make_state().await;
    assert_eq!(send(&state, get("/post/missing", None)).await.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn profile_lists_all_own_posts() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    post(&state, &alice, "Public one", true).await;
    post(&state, &alice, "Private one", false).await;
    post(&state, &bob, "Not mine", true).await;

    let cookie = session_cookie(&state, &alice).await;
    let html = body_text(send(&state, get("/profile", Some(&cookie))).await).await;
    assert!(html.contains("Public one"));
    assert!(html.contains("Private one"));
    assert!(!html.contains("Not mine"));
  }

  #[tokio::test]
  async fn post_content_is_escaped() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    post(&state, &alice, "<b>bold</b>", true).await;

    let html = body_text(send(&state, get("/", None)).await).await;
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!html.contains("<b>bold</b>"));
  }

  // ── Accounts ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn valid_registration_redirects_to_login() {
    let state = make_state().await;
    let resp = send(
      &state,
      post_form(
        "/register",
        None,
        "username=carol&email=carol%40example.com&password1=s3cret-pass&password2=s3cret-pass",
      ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert!(set_cookie(&resp, SESSION_COOKIE).is_none());

    let carol = state.store.find_user_by_username("carol").await.unwrap().unwrap();
    assert_eq!(carol.email, "carol@example.com");
    assert!(carol.password_hash.starts_with("$argon2"));
  }

  #[tokio::test]
  async fn invalid_registration_rerenders_without_creating_user() {
    let state = make_state().await;
    let resp = send(
      &state,
      post_form(
        "/register",
        None,
        "username=carol&email=carol%40example.com&password1=s3cret-pass&password2=other-pass",
      ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("The two password fields didn"));
    assert!(html.contains(r#"value="carol""#));
    assert!(!html.contains("s3cret-pass"));
    assert!(html.contains("Error registering!"));

    assert!(state.store.find_user_by_username("carol").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn registration_missing_field_reports_required() {
    let state = make_state().await;
    let resp = send(
      &state,
      post_form("/register", None, "username=carol&password1=s3cret-pass&password2=s3cret-pass"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert_eq!(html.matches("This field is required.").count(), 1);
    assert!(html.contains(
      r#"<span class="field-error">This field is required.</span>"#
    ));
    assert!(html.contains(r#"value="carol""#));

    assert!(state.store.find_user_by_username("carol").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn duplicate_username_is_a_field_error() {
    let state = make_state().await;
    user(&state, "carol").await;
    let resp = send(
      &state,
      post_form(
        "/register",
        None,
        "username=carol&email=c2%40example.com&password1=s3cret-pass&password2=s3cret-pass",
      ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("already exists"));
  }

  #[tokio::test]
  async fn correct_login_starts_a_session() {
    let state = make_state().await;
    user_with_password(&state, "dave", "open-sesame").await;

    let resp = send(&state, post_form("/login", None, "username=dave&password=open-sesame")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let session = set_cookie(&resp, SESSION_COOKIE).unwrap();
    let notices = set_cookie(&resp, NOTICE_COOKIE).unwrap();

    let home = send(&state, get("/", Some(&format!("{session}; {notices}")))).await;
    assert!(set_cookie(&home, NOTICE_COOKIE).is_some_and(|c| c == format!("{NOTICE_COOKIE}=")));
    let html = body_text(home).await;
    assert!(html.contains("You are logged in as dave"));
    assert!(html.contains("Log out (dave)"));

    let profile = send(&state, get("/profile", Some(&session))).await;
    assert_eq!(profile.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn wrong_password_redirects_back_without_session() {
    let state = make_state().await;
    user_with_password(&state, "dave", "open-sesame").await;

    let resp = send(&state, post_form("/login", None, "username=dave&password=guess")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert!(set_cookie(&resp, SESSION_COOKIE).is_none());

    let notices = set_cookie(&resp, NOTICE_COOKIE).unwrap();
    let html = body_text(send(&state, get("/login", Some(&notices))).await).await;
    assert!(html.contains("Invalid username or password."));
  }

  #[tokio::test]
  async fn logout_ends_the_session() {
    let state = make_state().await;
    let alice = user(&state, "alice").await;
    let cookie = session_cookie(&state, &alice).await;

    let confirm = send(&state, get("/logout", Some(&cookie))).await;
    assert_eq!(confirm.status(), StatusCode::OK);

    let resp = send(&state, post_form("/logout", Some(&cookie), "")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert_eq!(set_cookie(&resp, SESSION_COOKIE).as_deref(), Some("scribe_session="));

    let after = send(&state, get("/profile", Some(&cookie))).await;
    assert_eq!(location(&after), "/login");
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn default_config_is_valid() {
    assert!(ServerConfig::default().validate().is_ok());
  }

  #[test]
  fn unusable_config_values_are_rejected() {
    let bad = [
      ServerConfig { page_size: 0, ..Default::default() },
      ServerConfig { page_size: 101, max_page_size: 100, ..Default::default() },
      ServerConfig { session_ttl_hours: 0, ..Default::default() },
      ServerConfig { session_ttl_hours: -5, ..Default::default() },
      ServerConfig { session_ttl_hours: i64::MAX, ..Default::default() },
    ];
    for config in bad {
      assert!(config.validate().is_err(), "{config:?}");
    }
  }

  #[test]
  fn longest_session_lifetime_is_accepted() {
    let config = ServerConfig {
      session_ttl_hours: MAX_SESSION_TTL_HOURS,
      ..Default::default()
    };
    assert!(config.validate().is_ok());
  }

  #[tokio::test]
  async fn zero_page_size_is_not_found_instead_of_panicking() {
    let state = make_state_with(ServerConfig { page_size: 0, ..Default::default() }).await;
    let alice = user(&state, "alice").await;
    post(&state, &alice, "One", true).await;

    let resp = send(&state, get("/", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&state, get("/?size=5", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("One"));
  }

  #[tokio::test]
  async fn out_of_range_session_lifetime_fails_login_without_a_session() {
    let state = make_state_with(ServerConfig {
      session_ttl_hours: i64::MAX,
      ..Default::default()
    })
    .await;
    user_with_password(&state, "dave", "open-sesame").await;

    let resp = send(&state, post_form("/login", None, "username=dave&password=open-sesame")).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookie(&resp, SESSION_COOKIE).is_none());
  }
}
