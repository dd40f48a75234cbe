//! Page-number pagination over an ordered listing.
//!
//! Out-of-range requests are errors, never clamped: page 1 is always valid
//! (even for an empty listing), page 0, non-numeric pages, and pages past the
//! last one are rejected.

use serde::Serialize;

use crate::{Error, Result};

/// A validated `?page=&size=` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  /// 1-based page number.
  pub number: usize,
  pub size:   usize,
}

impl PageRequest {
  /// Parse raw query-string values. Absent values take the defaults (page 1,
  /// `default_size`).
  pub fn parse(
    page: Option<&str>,
    size: Option<&str>,
    default_size: usize,
    max_size: usize,
  ) -> Result<Self> {
    let number = match page {
      Some(raw) => parse_positive(raw).ok_or_else(|| Error::InvalidPageNumber(raw.to_owned()))?,
      None => 1,
    };
    let size = match size {
      Some(raw) => parse_positive(raw).ok_or_else(|| Error::InvalidPageSize(raw.to_owned()))?,
      None if default_size == 0 => return Err(Error::InvalidPageSize("0".to_owned())),
      None => default_size,
    };
    if size > max_size {
      return Err(Error::PageSizeTooLarge { size, max: max_size });
    }
    Ok(Self { number, size })
  }

  /// Resolve this request against a listing of `total` items.
  pub fn locate(self, total: usize) -> Result<PageBounds> {
    if self.size == 0 {
      return Err(Error::InvalidPageSize("0".to_owned()));
    }
    let last = total.div_ceil(self.size).max(1);
    if self.number > last {
      return Err(Error::EmptyPage { number: self.number, last });
    }
    Ok(PageBounds {
      number: self.number,
      last,
      total,
      offset: (self.number - 1) * self.size,
      limit: self.size,
    })
  }
}

fn parse_positive(raw: &str) -> Option<usize> {
  raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Where a valid page sits within the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
  pub number: usize,
  /// Number of the last page; at least 1.
  pub last:   usize,
  pub total:  usize,
  pub offset: usize,
  pub limit:  usize,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items:  Vec<T>,
  pub number: usize,
  pub last:   usize,
  pub total:  usize,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, bounds: PageBounds) -> Self {
    Self { items, number: bounds.number, last: bounds.last, total: bounds.total }
  }

  pub fn previous(&self) -> Option<usize> { (self.number > 1).then(|| self.number - 1) }

  pub fn next(&self) -> Option<usize> { (self.number < self.last).then(|| self.number + 1) }
}
