// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Seeding the muted-identity set from a paginated source.

use crate::error::{GateError, LookupError, Result};
use crate::memberset::MemberSet;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error, info};

/// Cursor value that marks the last page.
pub const LAST_PAGE_CURSOR: &str = "0";

/// One page of muted identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutedPage {
    pub ids: Vec<i64>,
    /// Cursor of the following page; `"0"` or empty when exhausted.
    #[serde(default)]
    pub next_cursor: String,
}

impl MutedPage {
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty() || self.next_cursor == LAST_PAGE_CURSOR
    }
}

/// Source of the current muted identities.
#[async_trait]
pub trait MutedSource: Send + Sync {
    /// Fetch the page at `cursor`; `None` requests the first page.
    async fn muted_page(&self, cursor: Option<&str>) -> std::result::Result<MutedPage, LookupError>;
}

/// Fetch every page of muted identities.
///
/// A source that hands back a cursor it already served is an error.
pub async fn fetch_all_muted(source: &dyn MutedSource) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;
    let mut visited = HashSet::new();

    loop {
        let page = source
            .muted_page(cursor.as_deref())
            .await
            .map_err(GateError::Muted)?;
        debug!(cursor = ?cursor, count = page.ids.len(), "Fetched muted page");
        ids.extend_from_slice(&page.ids);

        if page.is_last() {
            break;
        }
        if !visited.insert(page.next_cursor.clone()) {
            error!(cursor = %page.next_cursor, "Muted source repeated a cursor");
            return Err(GateError::Muted(LookupError::Unavailable(format!(
                "cursor {} was already fetched",
                page.next_cursor
            ))));
        }
        cursor = Some(page.next_cursor);
    }
    Ok(ids)
}

/// Add every muted identity to `muted_ids`. Returns the number fetched.
pub async fn populate_muted(source: &dyn MutedSource, muted_ids: &MemberSet) -> Result<usize> {
    let ids = fetch_all_muted(source).await?;
    for id in &ids {
        muted_ids.add(*id);
    }
    info!(count = ids.len(), "Muted identities loaded");
    Ok(ids.len())
}

/// Replace `muted_ids` with the source's current membership.
///
/// The set is swapped only after every page was fetched, so concurrent
/// gates never observe a partial list.
pub async fn refresh_muted(source: &dyn MutedSource, muted_ids: &MemberSet) -> Result<usize> {
    let ids = fetch_all_muted(source).await?;
    let count = ids.len();
    muted_ids.replace(ids);
    info!(count, "Muted identities refreshed");
    Ok(count)
}
