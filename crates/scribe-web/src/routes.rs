//! Named routes and the paths they resolve to.

/// Every page of the site. Handlers redirect to a `Route` rather than to a
/// literal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
  Home,
  About,
  Register,
  Login,
  Logout,
  Profile,
  CreatePost,
  PostDetail(&'a str),
  UpdatePost(&'a str),
  DeletePost(&'a str),
}

impl Route<'_> {
  pub fn path(&self) -> String {
    match self {
      Route::Home => "/".to_owned(),
      Route::About => "/about".to_owned(),
      Route::Register => "/register".to_owned(),
      Route::Login => "/login".to_owned(),
      Route::Logout => "/logout".to_owned(),
      Route::Profile => "/profile".to_owned(),
      Route::CreatePost => "/create".to_owned(),
      Route::PostDetail(slug) => format!("/post/{slug}"),
      Route::UpdatePost(slug) => format!("/post/{slug}/update"),
      Route::DeletePost(slug) => format!("/post/{slug}/delete"),
    }
  }
}
