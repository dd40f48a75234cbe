//! Form validators.
//!
//! Each raw input struct mirrors the submitted form fields as plain strings
//! (a missing field deserialises to empty) and validates into either a typed
//! value or a [`FieldErrors`] map, never both.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::post::{Post, PostChanges};

pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_TITLE_LEN: usize = 200;

const REQUIRED: &str = "This field is required.";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Field name → message for every field that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  /// Record `message` for `field`, keeping the first message per field.
  pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.entry(field).or_insert_with(|| message.into());
  }

  pub fn get(&self, field: &str) -> Option<&str> { self.0.get(field).map(String::as_str) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
    if self.is_empty() { Ok(value()) } else { Err(self) }
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
  pub username:  String,
  pub email:     String,
  pub password1: String,
  pub password2: String,
}

/// A registration that passed validation. The password is still plaintext;
/// hashing belongs to the identity layer.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub username: String,
  pub email:    String,
  pub password: String,
}

impl RegisterInput {
  pub const FIELDS: [&'static str; 4] = ["username", "email", "password1", "password2"];

  pub fn validate(&self) -> Result<NewAccount, FieldErrors> {
    let mut errors = FieldErrors::new();
    let username = self.username.trim();
    let email = self.email.trim();

    if username.is_empty() {
      errors.add("username", REQUIRED);
    } else if username.chars().count() > MAX_USERNAME_LEN {
      errors.add(
        "username",
        format!("Ensure this value has at most {MAX_USERNAME_LEN} characters."),
      );
    } else if !username.chars().all(is_username_char) {
      errors.add(
        "username",
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
      );
    }

    if email.is_empty() {
      errors.add("email", REQUIRED);
    } else if !is_plausible_email(email) {
      errors.add("email", "Enter a valid email address.");
    }

    if self.password1.is_empty() {
      errors.add("password1", REQUIRED);
    } else if self.password1.chars().count() < MIN_PASSWORD_LEN {
      errors.add(
        "password1",
        format!("This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."),
      );
    } else if self.password1.chars().all(|c| c.is_ascii_digit()) {
      errors.add("password1", "This password is entirely numeric.");
    } else if !username.is_empty()
      && self.password1.to_lowercase().contains(&username.to_lowercase())
    {
      errors.add("password1", "The password is too similar to the username.");
    }

    if self.password2.is_empty() {
      errors.add("password2", REQUIRED);
    } else if self.password1 != self.password2 {
      errors.add("password2", "The two password fields didn't match.");
    }

    errors.finish(|| NewAccount {
      username: username.to_owned(),
      email:    email.to_owned(),
      password: self.password1.clone(),
    })
  }
}

fn is_username_char(c: char) -> bool {
  c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn is_plausible_email(s: &str) -> bool {
  if s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl LoginInput {
  pub const FIELDS: [&'static str; 2] = ["username", "password"];

  pub fn validate(&self) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::new();
    let username = self.username.trim();
    if username.is_empty() {
      errors.add("username", REQUIRED);
    }
    if self.password.is_empty() {
      errors.add("password", REQUIRED);
    }
    errors.finish(|| Credentials {
      username: username.to_owned(),
      password: self.password.clone(),
    })
  }
}

// ─── Posts ───────────────────────────────────────────────────────────────────

/// Shared by the create and update forms; both edit the same three fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostInput {
  pub title:     String,
  pub content:   String,
  /// HTML checkbox: present (any value but `false`/`off`/`0`) means checked.
  pub is_active: Option<String>,
}

impl PostInput {
  pub const FIELDS: [&'static str; 3] = ["title", "content", "is_active"];

  /// The values a fresh create form starts with.
  pub fn blank() -> Self { Self { is_active: Some("on".to_owned()), ..Self::default() } }

  /// An update form prefilled from `post`.
  pub fn from_post(post: &Post) -> Self {
    Self {
      title:     post.title.clone(),
      content:   post.content.clone(),
      is_active: post.is_active.then(|| "on".to_owned()),
    }
  }

  pub fn is_checked(&self) -> bool {
    match self.is_active.as_deref().map(str::trim) {
      None => false,
      Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "false" | "off" | "0"),
    }
  }

  pub fn validate(&self) -> Result<PostChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let title = self.title.trim();
    let content = self.content.trim();

    if title.is_empty() {
      errors.add("title", REQUIRED);
    } else if title.chars().count() > MAX_TITLE_LEN {
      errors.add(
        "title",
        format!("Ensure this value has at most {MAX_TITLE_LEN} characters."),
      );
    }
    if content.is_empty() {
      errors.add("content", REQUIRED);
    }

    errors.finish(|| PostChanges {
      title:     title.to_owned(),
      content:   content.to_owned(),
      is_active: self.is_checked(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn registration() -> RegisterInput {
    RegisterInput {
      username:  "alice".into(),
      email:     "alice@example.com".into(),
      password1: "correct horse".into(),
      password2: "correct horse".into(),
    }
  }

  #[test]
  fn valid_registration() {
    let account = registration().validate().unwrap();
    assert_eq!(account.username, "alice");
    assert_eq!(account.password, "correct horse");
  }

  #[test]
  fn registration_reports_each_missing_field() {
    let errors = RegisterInput::default().validate().unwrap_err();
    for field in RegisterInput::FIELDS {
      assert_eq!(errors.get(field), Some(REQUIRED), "{field}");
    }
  }

  #[test]
  fn registration_rejects_bad_values() {
    let mut input = registration();
    input.username = "al ice".into();
    input.email = "alice.example.com".into();
    input.password2 = "something else".into();
    let errors = input.validate().unwrap_err();
    assert!(errors.get("username").is_some());
    assert!(errors.get("email").is_some());
    assert!(errors.get("password1").is_none());
    assert!(errors.get("password2").unwrap().contains("didn't match"));
  }

  #[test]
  fn weak_passwords_are_rejected() {
    for (password, needle) in [
      ("short", "too short"),
      ("12345678901", "entirely numeric"),
      ("xxALICExx", "too similar"),
    ] {
      let mut input = registration();
      input.password1 = password.into();
      input.password2 = password.into();
      let errors = input.validate().unwrap_err();
      assert!(errors.get("password1").unwrap().contains(needle), "{password}");
    }
  }

  #[test]
  fn login_requires_both_fields() {
    let errors = LoginInput { username: "  ".into(), password: String::new() }
      .validate()
      .unwrap_err();
    assert!(errors.get("username").is_some());
    assert!(errors.get("password").is_some());

    let creds = LoginInput { username: " bob ".into(), password: "pw".into() }
      .validate()
      .unwrap();
    assert_eq!(creds.username, "bob");
  }

  #[test]
  fn post_checkbox_semantics() {
    let mut input = PostInput { title: "T".into(), content: "C".into(), is_active: None };
    assert!(!input.validate().unwrap().is_active);
    input.is_active = Some("on".into());
    assert!(input.validate().unwrap().is_active);
    input.is_active = Some("false".into());
    assert!(!input.validate().unwrap().is_active);
  }

  #[test]
  fn post_requires_title_and_content() {
    let errors = PostInput::default().validate().unwrap_err();
    assert!(errors.get("title").is_some());
    assert!(errors.get("content").is_some());
    assert!(errors.get("is_active").is_none());

    let long = PostInput { title: "x".repeat(MAX_TITLE_LEN + 1), content: "c".into(), is_active: None };
    assert!(long.validate().unwrap_err().get("title").unwrap().contains("at most"));
  }

  #[test]
  fn blank_form_starts_active() {
    assert!(PostInput::blank().is_checked());
  }

  #[test]
  fn prefilled_form_validates_to_the_same_fields() {
    let post = Post {
      post_id:      1,
      title:        "Kept".into(),
      content:      "Body".into(),
      slug:         "kept".into(),
      author_id:    7,
      author_name:  "alice".into(),
      is_active:    false,
      published_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
      created_at:   chrono::Utc::now(),
    };
    let changes = PostInput::from_post(&post).validate().unwrap();
    assert_eq!(changes, PostChanges { title: "Kept".into(), content: "Body".into(), is_active: false });
  }
}
