//! Template rendering.
//!
//! Templates use Go template syntax (via `gtmpl`) and are compiled into the
//! binary. gtmpl does not escape output, so every value placed in a
//! [`Context`] is HTML-escaped on insertion; only [`Context::html`] bypasses
//! that, for markup this crate rendered itself.

use std::collections::HashMap;

use gtmpl::{Template, Value};
use pulldown_cmark::escape::escape_html;
use scribe_core::{form::FieldErrors, notice::Notice, post::Post, user::User};

use crate::{error::Error, routes::Route};

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
  /// Page chrome wrapping every non-fragment response.
  Shell,
  Notices,
  Register,
  Login,
  Logout,
  Home,
  About,
  PostDetail,
  Profile,
  PostCreate,
  PostUpdate,
  PostDelete,
}

impl View {
  pub const ALL: [View; 12] = [
    View::Shell,
    View::Notices,
    View::Register,
    View::Login,
    View::Logout,
    View::Home,
    View::About,
    View::PostDetail,
    View::Profile,
    View::PostCreate,
    View::PostUpdate,
    View::PostDelete,
  ];

  pub fn name(self) -> &'static str {
    match self {
      View::Shell => "blog/include_blog.html",
      View::Notices => "blog/notices.html",
      View::Register => "blog/register.html",
      View::Login => "blog/login.html",
      View::Logout => "blog/logout.html",
      View::Home => "blog/home.html",
      View::About => "blog/about.html",
      View::PostDetail => "blog/post_detail.html",
      View::Profile => "blog/user_posts.html",
      View::PostCreate => "blog/post_form.html",
      View::PostUpdate => "blog/post_update.html",
      View::PostDelete => "blog/post_confirm_delete.html",
    }
  }

  fn source(self) -> &'static str {
    match self {
      View::Shell => include_str!("../templates/blog/include_blog.html"),
      View::Notices => include_str!("../templates/blog/notices.html"),
      View::Register => include_str!("../templates/blog/register.html"),
      View::Login => include_str!("../templates/blog/login.html"),
      View::Logout => include_str!("../templates/blog/logout.html"),
      View::Home => include_str!("../templates/blog/home.html"),
      View::About => include_str!("../templates/blog/about.html"),
      View::PostDetail => include_str!("../templates/blog/post_detail.html"),
      View::Profile => include_str!("../templates/blog/user_posts.html"),
      View::PostCreate => include_str!("../templates/blog/post_form.html"),
      View::PostUpdate => include_str!("../templates/blog/post_update.html"),
      View::PostDelete => include_str!("../templates/blog/post_confirm_delete.html"),
    }
  }
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// The parsed page templates, one per [`View`].
pub struct Templates {
  parsed: HashMap<View, Template>,
}

impl Templates {
  /// Parse every template once; syntax errors fail startup rather than a
  /// request.
  pub fn load() -> Result<Self, Error> {
    let mut parsed = HashMap::new();
    for view in View::ALL {
      let mut template = Template::default();
      template
        .parse(view.source())
        .map_err(|e| Error::Template(format!("{}: {e}", view.name())))?;
      parsed.insert(view, template);
    }
    Ok(Self { parsed })
  }

  pub fn render(&self, view: View, context: &Context) -> Result<String, Error> {
    let failed = |e: String| Error::Template(format!("{}: {e}", view.name()));
    let template = self
      .parsed
      .get(&view)
      .ok_or_else(|| failed("not loaded".to_owned()))?;
    let ctx = gtmpl::Context::from(context.to_value()).map_err(|e| failed(e.to_string()))?;
    let mut out = Vec::new();
    template.execute(&mut out, &ctx).map_err(|e| failed(e.to_string()))?;
    String::from_utf8(out).map_err(|e| failed(e.to_string()))
  }
}

// ─── Context ─────────────────────────────────────────────────────────────────

/// Key → value mapping handed to a template.
#[derive(Debug, Clone, Default)]
pub struct Context(HashMap<String, Value>);

impl Context {
  pub fn new() -> Self { Self::default() }

  /// Insert escaped text.
  pub fn text(mut self, key: &str, value: &str) -> Self {
    self.0.insert(key.to_owned(), Value::String(escape(value)));
    self
  }

  pub fn flag(mut self, key: &str, value: bool) -> Self {
    self.0.insert(key.to_owned(), Value::Bool(value));
    self
  }

  /// Insert a value built by one of the `*_value` helpers below.
  pub fn value(mut self, key: &str, value: Value) -> Self {
    self.0.insert(key.to_owned(), value);
    self
  }

  /// Insert trusted, already-rendered markup.
  pub fn html(mut self, key: &str, markup: String) -> Self {
    self.0.insert(key.to_owned(), Value::String(markup));
    self
  }

  fn to_value(&self) -> Value { Value::Object(self.0.clone()) }
}

// ─── Value builders ──────────────────────────────────────────────────────────

/// Escape text for use in HTML element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  // Writing into a `String` cannot fail.
  let _ = escape_html(&mut out, s);
  out
}

fn text(s: &str) -> Value { Value::String(escape(s)) }

pub fn post_value(post: &Post) -> Value {
  let mut m: HashMap<String, Value> = HashMap::new();
  m.insert("title".to_owned(), text(&post.title));
  m.insert("content".to_owned(), text(&post.content));
  m.insert("slug".to_owned(), text(&post.slug));
  m.insert("author_name".to_owned(), text(&post.author_name));
  m.insert("is_active".to_owned(), Value::Bool(post.is_active));
  m.insert("published_at".to_owned(), text(&post.published_at.to_string()));
  m.insert("url".to_owned(), text(&Route::PostDetail(&post.slug).path()));
  m.insert("update_url".to_owned(), text(&Route::UpdatePost(&post.slug).path()));
  m.insert("delete_url".to_owned(), text(&Route::DeletePost(&post.slug).path()));
  Value::Object(m)
}

pub fn posts_value(posts: &[Post]) -> Value { Value::Array(posts.iter().map(post_value).collect()) }

pub fn user_value(user: Option<&User>) -> Value {
  match user {
    Some(u) => {
      let mut m: HashMap<String, Value> = HashMap::new();
      m.insert("username".to_owned(), text(&u.username));
      Value::Object(m)
    }
    None => Value::Nil,
  }
}

pub fn notices_value(notices: &[Notice]) -> Value {
  Value::Array(
    notices
      .iter()
      .map(|n| {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("level".to_owned(), text(n.level.as_str()));
        m.insert("message".to_owned(), text(&n.message));
        Value::Object(m)
      })
      .collect(),
  )
}

/// A form as templates see it: `values` and `errors`, each keyed by every
/// field name so templates can address fields unconditionally.
pub fn form_value(
  fields: &[&'static str],
  value_of: impl Fn(&str) -> String,
  errors: &FieldErrors,
) -> Value {
  let mut values: HashMap<String, Value> = HashMap::new();
  let mut messages: HashMap<String, Value> = HashMap::new();
  for field in fields {
    values.insert((*field).to_owned(), text(&value_of(field)));
    messages.insert((*field).to_owned(), text(errors.get(field).unwrap_or_default()));
  }
  let mut m: HashMap<String, Value> = HashMap::new();
  m.insert("values".to_owned(), Value::Object(values));
  m.insert("errors".to_owned(), Value::Object(messages));
  m.insert("invalid".to_owned(), Value::Bool(!errors.is_empty()));
  Value::Object(m)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_template_parses() {
    let templates = Templates::load().unwrap();
    assert_eq!(templates.parsed.len(), View::ALL.len());
  }

  #[test]
  fn escape_covers_markup_characters() {
    assert_eq!(
      escape(r#"<a href="x">&amp;</a>"#),
      "&lt;a href=&quot;x&quot;&gt;&amp;amp;&lt;/a&gt;"
    );
  }

  #[test]
  fn text_values_are_escaped_when_rendered() {
    let templates = Templates::load().unwrap();
    let notices = vec![Notice::new(scribe_core::notice::Level::Error, "<script>")];
    let html = templates
      .render(View::Notices, &Context::new().value("notices", notices_value(&notices)))
      .unwrap();
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
  }
}
