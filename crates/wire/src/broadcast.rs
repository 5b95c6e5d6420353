// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State broadcasts sent to every currently-registered client.

use crate::response::Reply;
use brr_core::LauncherBundleId;
use serde_json::json;

/// The six broadcast kinds named in the design.
#[derive(Debug, Clone, PartialEq)]
pub enum Broadcast {
    Ready { needs_bundle: bool },
    Reconnecting { launcher_bundle_id: LauncherBundleId, attempt: u32 },
    Reconnected { launcher_bundle_id: LauncherBundleId },
    Disconnected { launcher_bundle_id: LauncherBundleId },
    WatchersReestablished { launcher_bundle_id: LauncherBundleId, count: usize },
    NeedsReinit { reason: String },
}

impl Broadcast {
    pub fn kind(&self) -> &'static str {
        match self {
            Broadcast::Ready { .. } => "ready",
            Broadcast::Reconnecting { .. } => "reconnecting",
            Broadcast::Reconnected { .. } => "reconnected",
            Broadcast::Disconnected { .. } => "disconnected",
            Broadcast::WatchersReestablished { .. } => "watchersReestablished",
            Broadcast::NeedsReinit { .. } => "needsReinit",
        }
    }

    /// Converts to the `Reply`-shaped (but `id`-less) wire message every
    /// broadcast is delivered as.
    pub fn into_reply(self) -> Reply {
        let kind = self.kind();
        let data = match &self {
            Broadcast::Ready { needs_bundle } => json!({ "needsBundle": needs_bundle }),
            Broadcast::Reconnecting { launcher_bundle_id, attempt } => {
                json!({ "launcherBundleId": launcher_bundle_id.as_str(), "attempt": attempt })
            }
            Broadcast::Reconnected { launcher_bundle_id } => {
                json!({ "launcherBundleId": launcher_bundle_id.as_str() })
            }
            Broadcast::Disconnected { launcher_bundle_id } => {
                json!({ "launcherBundleId": launcher_bundle_id.as_str() })
            }
            Broadcast::WatchersReestablished { launcher_bundle_id, count } => {
                json!({ "launcherBundleId": launcher_bundle_id.as_str(), "count": count })
            }
            Broadcast::NeedsReinit { reason } => json!({ "reason": reason }),
        };
        Reply::ok(kind, None, Some(data))
    }
}
