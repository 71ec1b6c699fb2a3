//! Logical request/response pairs exchanged between a replica and the
//! owner's asset host. Transport framing is out of scope; any transport that
//! delivers these messages intact will do.

use serde::{Deserialize, Serialize};
use worksync_assets::AssetPayload;
use worksync_types::Checksum;

pub const PROTOCOL_VERSION: u32 = 1;

/// Requests a replica accepts from the owner, plus the fetches it issues
/// back to the owner's asset host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SyncRequest {
    /// Reconcile the primary workspace against this root checksum.
    SynchronizePrimaryWorkspace { root: Checksum },
    /// Pre-populate the global asset scope with these checksums.
    SynchronizeGlobalAssets { checksums: Vec<Checksum> },
    /// Fetch one asset by checksum.
    FetchAsset { checksum: Checksum },
    /// Fetch a batch of assets by checksum.
    FetchAssets { checksums: Vec<Checksum> },
}

/// Responses to [`SyncRequest`]s.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SyncResponse {
    /// The request completed.
    Ack,
    /// A single fetched asset.
    Asset { payload: AssetPayload },
    /// A batch of fetched assets, in request order.
    Assets { payloads: Vec<AssetPayload> },
    /// The request failed.
    Error { message: String },
}

impl SyncRequest {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SynchronizePrimaryWorkspace { .. } => "SynchronizePrimaryWorkspace",
            Self::SynchronizeGlobalAssets { .. } => "SynchronizeGlobalAssets",
            Self::FetchAsset { .. } => "FetchAsset",
            Self::FetchAssets { .. } => "FetchAssets",
        }
    }
}

impl SyncResponse {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Ack => "Ack",
            Self::Asset { .. } => "Asset",
            Self::Assets { .. } => "Assets",
            Self::Error { .. } => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn request_roundtrip() {
        let request = SyncRequest::SynchronizePrimaryWorkspace {
            root: Checksum::from_hash([7; 32]),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: SyncRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.type_name(), "SynchronizePrimaryWorkspace");
        match parsed {
            SyncRequest::SynchronizePrimaryWorkspace { root } => {
                assert_eq!(root, Checksum::from_hash([7; 32]));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn response_roundtrip() {
        let payload = AssetPayload::Content(Bytes::from_static(b"text"));
        let response = SyncResponse::Asset {
            payload: payload.clone(),
        };
        let json = serde_json::to_string(&response).unwrap();
        let parsed: SyncResponse = serde_json::from_str(&json).unwrap();
        match parsed {
            SyncResponse::Asset { payload: parsed } => assert_eq!(parsed, payload),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn type_names_cover_all_variants() {
        assert_eq!(
            SyncRequest::FetchAsset {
                checksum: Checksum::null()
            }
            .type_name(),
            "FetchAsset"
        );
        assert_eq!(SyncResponse::Ack.type_name(), "Ack");
        assert_eq!(
            SyncResponse::Error {
                message: "boom".into()
            }
            .type_name(),
            "Error"
        );
    }
}
