//! Response construction shared by every controller: the partial-render
//! policy and redirects.
//!
//! A controller names the [`View`] that makes up its page. For a fragment
//! request that view is returned as is. Otherwise it is embedded in the
//! shell template, which receives the inner template's name under
//! [`TEMPLATE_KEY`]. Redirects never go through the shell.

use axum::{
  http::{HeaderValue, header},
  response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
  error::Error,
  routes::Route,
  templates::{Context, Templates, View, notices_value, user_value},
  visitor::{FRAGMENT_HEADER, Visitor},
};

/// Shell context key holding the name of the embedded template.
pub const TEMPLATE_KEY: &str = "template_htmx";

/// Render `view` for `visitor`, wrapped in the shell unless this is a
/// fragment request. Pending notices are displayed and consumed.
pub fn render(
  templates: &Templates,
  mut visitor: Visitor,
  view: View,
  context: Context,
) -> Result<Response, Error> {
  let notices = visitor.take_notices();
  let context = context
    .value("user", user_value(visitor.user.as_ref()))
    .text(TEMPLATE_KEY, view.name());

  let inner = templates.render(view, &context)?;
  let notice_block = templates.render(
    View::Notices,
    &Context::new().value("notices", notices_value(&notices)),
  )?;

  let body = if visitor.fragment {
    format!("{notice_block}{inner}")
  } else {
    let shell = context.html("notices", notice_block).html("content", inner);
    templates.render(View::Shell, &shell)?
  };

  let mut response = Html(body).into_response();
  response
    .headers_mut()
    .insert(header::VARY, HeaderValue::from_static(FRAGMENT_HEADER));
  visitor.write_cookies(&mut response);
  Ok(response)
}

/// Redirect to `route`, carrying pending notices to the next page.
pub fn redirect(mut visitor: Visitor, route: Route<'_>) -> Result<Response, Error> {
  visitor.stash_notices()?;
  let mut response = Redirect::to(&route.path()).into_response();
  visitor.write_cookies(&mut response);
  Ok(response)
}
