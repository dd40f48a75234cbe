//! Registration, login and logout.

use axum::{Form, extract::State, response::Response};
use scribe_core::{
  form::{FieldErrors, LoginInput, RegisterInput},
  notice::Level,
  store::BlogStore,
  user::NewUser,
};

use crate::{
  AppState, auth,
  error::Error,
  page,
  routes::Route,
  templates::{Context, View, form_value},
  visitor::Visitor,
};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

// ─── Register ────────────────────────────────────────────────────────────────

pub async fn register_form<S>(
  State(state): State<AppState<S>>,
  visitor: Visitor,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  render_register(&state, visitor, &RegisterInput::default(), &FieldErrors::new())
}

pub async fn register<S>(
  State(state): State<AppState<S>>,
  mut visitor: Visitor,
  Form(input): Form<RegisterInput>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account = match input.validate() {
    Ok(account) => account,
    Err(errors) => {
      visitor.notify(Level::Warning, "Error registering!");
      return render_register(&state, visitor, &input, &errors);
    }
  };

  let taken = state
    .store
    .find_user_by_username(&account.username)
    .await
    .map_err(Error::store)?
    .is_some();

  let created = if taken {
    None
  } else {
    let password_hash = auth::hash_password(&account.password)?;
    state
      .store
      .create_user(NewUser {
        username: account.username,
        email: account.email,
        password_hash,
      })
      .await
      .map_err(Error::store)?
  };

  let Some(user) = created else {
    let mut errors = FieldErrors::new();
    errors.add("username", USERNAME_TAKEN);
    visitor.notify(Level::Warning, "Error registering!");
    return render_register(&state, visitor, &input, &errors);
  };

  tracing::info!(user_id = user.user_id, username = %user.username, "registered user");
  visitor.notify(Level::Success, "User successfully registered");
  page::redirect(visitor, Route::Login)
}

/// Passwords are never echoed back into the form.
fn render_register<S: BlogStore>(
  state: &AppState<S>,
  visitor: Visitor,
  input: &RegisterInput,
  errors: &FieldErrors,
) -> Result<Response, Error> {
  let form = form_value(
    &RegisterInput::FIELDS,
    |field| match field {
      "username" => input.username.clone(),
      "email" => input.email.clone(),
      _ => String::new(),
    },
    errors,
  );
  page::render(&state.templates, visitor, View::Register, Context::new().value("form", form))
}

// ─── Login ───────────────────────────────────────────────────────────────────

pub async fn login_form<S>(
  State(state): State<AppState<S>>,
  visitor: Visitor,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  render_login(&state, visitor, &LoginInput::default(), &FieldErrors::new())
}

pub async fn login<S>(
  State(state): State<AppState<S>>,
  mut visitor: Visitor,
  Form(input): Form<LoginInput>,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let creds = match input.validate() {
    Ok(creds) => creds,
    Err(errors) => return render_login(&state, visitor, &input, &errors),
  };

  match auth::authenticate(&state, &creds).await? {
    Some(user) => {
      auth::start_session(&state, &mut visitor, &user).await?;
      tracing::info!(user_id = user.user_id, "user logged in");
      visitor.notify(Level::Info, format!("You are logged in as {}", user.username));
      page::redirect(visitor, Route::Home)
    }
    None => {
      tracing::info!(username = %creds.username, "rejected login");
      visitor.notify(Level::Error, "Invalid username or password.");
      page::redirect(visitor, Route::Login)
    }
  }
}

fn render_login<S: BlogStore>(
  state: &AppState<S>,
  visitor: Visitor,
  input: &LoginInput,
  errors: &FieldErrors,
) -> Result<Response, Error> {
  let form = form_value(
    &LoginInput::FIELDS,
    |field| match field {
      "username" => input.username.clone(),
      _ => String::new(),
    },
    errors,
  );
  page::render(&state.templates, visitor, View::Login, Context::new().value("form", form))
}

// ─── Logout ──────────────────────────────────────────────────────────────────

pub async fn logout_confirm<S>(
  State(state): State<AppState<S>>,
  visitor: Visitor,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  page::render(&state.templates, visitor, View::Logout, Context::new())
}

pub async fn logout<S>(
  State(state): State<AppState<S>>,
  mut visitor: Visitor,
) -> Result<Response, Error>
where
  S: BlogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(user_id) = visitor.user_id() {
    tracing::info!(user_id, "user logged out");
  }
  auth::end_session(&state, &mut visitor).await?;
  page::redirect(visitor, Route::Home)
}
