//! Generates the gRPC plumbing for the Envoy Gateway extension service.
//!
//! The request/response messages live in `src/extension/proto.rs` as prost
//! derives over envoy-types messages, so only the service definition is
//! described here.

fn main() {
    let method = |name: &str, route: &str, input: &str, output: &str| {
        tonic_build::manual::Method::builder()
            .name(name)
            .route_name(route)
            .input_type(format!("crate::extension::proto::{}", input))
            .output_type(format!("crate::extension::proto::{}", output))
            .codec_path("tonic_prost::ProstCodec")
            .build()
    };

    let service = tonic_build::manual::Service::builder()
        .name("EnvoyGatewayExtension")
        .package("envoygateway.extension")
        .method(method(
            "post_route_modify",
            "PostRouteModify",
            "PostRouteModifyRequest",
            "PostRouteModifyResponse",
        ))
        .method(method(
            "post_virtual_host_modify",
            "PostVirtualHostModify",
            "PostVirtualHostModifyRequest",
            "PostVirtualHostModifyResponse",
        ))
        .method(method(
            "post_http_listener_modify",
            "PostHTTPListenerModify",
            "PostHttpListenerModifyRequest",
            "PostHttpListenerModifyResponse",
        ))
        .method(method(
            "post_translate_modify",
            "PostTranslateModify",
            "PostTranslateModifyRequest",
            "PostTranslateModifyResponse",
        ))
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
