//! Upload-notification event shapes, matching the S3 notification format.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A batch of upload notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<UploadRecord>,
}

/// One notification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRecord {
    pub s3: S3Entity,
    #[serde(rename = "eventName", skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntity {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Error)]
pub enum KeyDecodeError {
    #[error("Missing object key in event record")]
    MissingKey,

    #[error("Failed to decode object key {key:?}: {reason}")]
    Invalid { key: String, reason: String },
}

impl UploadRecord {
    /// Extract and URL-decode the object key.
    ///
    /// Notification keys are URL-encoded with spaces as `+`, so `+` is
    /// restored before percent-decoding.
    pub fn decoded_key(&self) -> Result<String, KeyDecodeError> {
        let raw = &self.s3.object.key;
        if raw.is_empty() {
            return Err(KeyDecodeError::MissingKey);
        }

        let plus_restored = raw.replace('+', " ");
        percent_decode_str(&plus_restored)
            .decode_utf8()
            .map(|s| s.into_owned())
            .map_err(|e| KeyDecodeError::Invalid {
                key: raw.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str) -> UploadRecord {
        UploadRecord {
            s3: S3Entity {
                bucket: BucketEntity {
                    name: "raw-bucket".to_string(),
                },
                object: ObjectEntity {
                    key: key.to_string(),
                    size: None,
                },
            },
            event_name: Some("ObjectCreated:Put".to_string()),
        }
    }

    #[test]
    fn test_parses_notification_json() {
        let json = r#"{
            "Records": [
                {
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": { "name": "raw-bucket" },
                        "object": { "key": "projA/raw/clip.mp4", "size": 1024 }
                    }
                }
            ]
        }"#;
        let event: UploadEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].s3.object.key, "projA/raw/clip.mp4");
    }

    #[test]
    fn test_missing_records_defaults_to_empty() {
        let event: UploadEvent = serde_json::from_str("{}").unwrap();
        assert!(event.records.is_empty());
    }

    #[test]
    fn test_decoded_key_restores_spaces_and_percent_escapes() {
        let r = record("projA/raw/my+clip%281%29.mp4");
        assert_eq!(r.decoded_key().unwrap(), "projA/raw/my clip(1).mp4");
    }

    #[test]
    fn test_decoded_key_rejects_invalid_utf8() {
        let r = record("projA/%FF%FE.mp4");
        assert!(matches!(
            r.decoded_key(),
            Err(KeyDecodeError::Invalid { .. })
        ));
    }

    #[test]
    fn test_decoded_key_rejects_empty() {
        let r = record("");
        assert!(matches!(r.decoded_key(), Err(KeyDecodeError::MissingKey)));
    }
}
