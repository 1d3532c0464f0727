// src/query.rs
use crate::utils::{atoi, RequestError};
use serde::Deserialize;

/// Marks an absent or unusable appkey selector: no app key filter.
pub const APPKEY_UNSET: i32 = -1;
/// Effective pagesize when the selector is absent, sized to pull every
/// record the binary format can carry in one response.
pub const PAGESIZE_ALL: i32 = 255;
/// Effective pagesize when the selector is present but unparsable.
pub const PAGESIZE_FALLBACK: i32 = 6;

/// Listing selectors exactly as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub platform: Option<String>,
    pub appkey: Option<String>,
    pub pagesize: Option<String>,
    pub page: Option<String>,
    pub offset: Option<String>,
    pub bin: Option<String>,
}

/// Validated listing selectors. Built per request, discarded with it.
#[derive(Debug, PartialEq, Eq)]
pub struct ListingSelector {
    pub platform: String,
    pub appkey: i32,
    pub pagesize: i32,
    pub offset: i32,
    pub binary: bool,
}

impl ListingSelector {
    /// Applies the selector defaults table. The platform is the only
    /// mandatory selector; every numeric selector falls back instead of
    /// failing:
    ///
    /// | selector   | absent      | unparsable |
    /// |------------|-------------|------------|
    /// | `appkey`   | -1          | -1         |
    /// | `pagesize` | 255 ("all") | 6          |
    /// | `page`     | 0           | 0          |
    /// | `offset`   | page based  | 0          |
    /// | `bin`      | JSON        | JSON       |
    ///
    /// `page` and `offset` only take effect when `pagesize` is supplied.
    /// With both present, the explicit `offset` wins over the
    /// page-derived one; the page-derived offset saturates at the `i32`
    /// bounds. Binary output requires `bin` to be exactly `1`.
    pub fn parse(query: &ListingQuery) -> Result<ListingSelector, RequestError> {
        let platform = match query.platform.as_deref() {
            Some(platform) if !platform.is_empty() => platform.to_string(),
            _ => return Err(RequestError::MissingPlatform),
        };

        let appkey = query
            .appkey
            .as_deref()
            .map_or(APPKEY_UNSET, |v| atoi(v, APPKEY_UNSET));

        let mut pagesize = PAGESIZE_ALL;
        let mut offset = 0;

        if let Some(raw) = non_empty(query.pagesize.as_deref()) {
            pagesize = atoi(raw, PAGESIZE_FALLBACK);

            if let Some(page) = non_empty(query.page.as_deref()) {
                offset = pagesize.saturating_mul(atoi(page, 0));
            }
            if let Some(explicit) = non_empty(query.offset.as_deref()) {
                offset = atoi(explicit, 0);
            }
        }

        Ok(ListingSelector {
            platform,
            appkey,
            pagesize,
            offset,
            binary: query.bin.as_deref() == Some("1"),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
