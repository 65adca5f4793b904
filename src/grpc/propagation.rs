// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller identity propagation into outgoing gRPC metadata.

use tonic::metadata::{AsciiMetadataValue, MetadataMap};

use crate::auth::RequestContext;

/// Metadata key carrying the caller's user id to backends.
pub const USER_ID_METADATA_KEY: &str = "x-user-id";

/// Outgoing metadata for one backend call.
///
/// Contains exactly one `x-user-id` entry when the context is authenticated
/// and nothing otherwise.
pub fn outgoing_metadata(ctx: &RequestContext) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    inject_identity(ctx, &mut metadata);
    metadata
}

/// Add the caller's identity to an existing metadata map.
///
/// Any `x-user-id` value already present (for instance copied from client
/// headers) is replaced, so backends only ever see the verified identity.
pub fn inject_identity(ctx: &RequestContext, metadata: &mut MetadataMap) {
    metadata.remove(USER_ID_METADATA_KEY);
    if let Some(identity) = ctx.caller() {
        // A decimal integer is always valid ASCII metadata.
        let value = AsciiMetadataValue::from(identity.user_id());
        metadata.insert(USER_ID_METADATA_KEY, value);
    }
}

/// Wrap `message` in a request carrying the caller's identity.
pub fn request_with_identity<T>(ctx: &RequestContext, message: T) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    inject_identity(ctx, request.metadata_mut());
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CallerIdentity;

    #[test]
    fn authenticated_context_emits_one_pair() {
        let ctx = RequestContext::authenticated(CallerIdentity::new(42));
        let metadata = outgoing_metadata(&ctx);

        assert_eq!(metadata.len(), 1);
        assert_eq!(
            metadata.get(USER_ID_METADATA_KEY).unwrap().to_str().unwrap(),
            "42"
        );
    }

    #[test]
    fn anonymous_context_emits_nothing() {
        let metadata = outgoing_metadata(&RequestContext::anonymous());
        assert!(metadata.is_empty());
    }

    #[test]
    fn negative_ids_are_rendered_in_decimal() {
        let ctx = RequestContext::authenticated(CallerIdentity::new(-15));
        let metadata = outgoing_metadata(&ctx);
        assert_eq!(
            metadata.get(USER_ID_METADATA_KEY).unwrap().to_str().unwrap(),
            "-15"
        );
    }

    #[test]
    fn spoofed_user_id_is_replaced() {
        let mut metadata = MetadataMap::new();
        metadata.insert(USER_ID_METADATA_KEY, "1".parse().unwrap());

        inject_identity(&RequestContext::authenticated(CallerIdentity::new(2)), &mut metadata);
        assert_eq!(metadata.get_all(USER_ID_METADATA_KEY).iter().count(), 1);
        assert_eq!(
            metadata.get(USER_ID_METADATA_KEY).unwrap().to_str().unwrap(),
            "2"
        );

        inject_identity(&RequestContext::anonymous(), &mut metadata);
        assert!(metadata.get(USER_ID_METADATA_KEY).is_none());
    }

    #[test]
    fn request_with_identity_keeps_the_message() {
        let ctx = RequestContext::authenticated(CallerIdentity::new(3));
        let request = request_with_identity(&ctx, "payload");
        assert_eq!(*request.get_ref(), "payload");
        assert!(request.metadata().get(USER_ID_METADATA_KEY).is_some());
    }
}
