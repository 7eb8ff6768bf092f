//! tonic service binding for [`GatewayExtension`]

use crate::extension::proto::envoy_gateway_extension_server::EnvoyGatewayExtension;
use crate::extension::proto::{
    PostHttpListenerModifyRequest, PostHttpListenerModifyResponse, PostRouteModifyRequest,
    PostRouteModifyResponse, PostTranslateModifyRequest, PostTranslateModifyResponse,
    PostVirtualHostModifyRequest, PostVirtualHostModifyResponse,
};
use crate::extension::GatewayExtension;
use tonic::{Request, Response, Status};
use tracing::error;

/// Convert a hook result into a gRPC response, logging fatal errors
fn respond<T>(hook: &str, result: crate::Result<T>) -> std::result::Result<Response<T>, Status> {
    match result {
        Ok(body) => Ok(Response::new(body)),
        Err(e) => {
            error!(hook = %hook, error = %e, "Extension hook failed");
            Err(Status::from(e))
        }
    }
}

#[tonic::async_trait]
impl EnvoyGatewayExtension for GatewayExtension {
    async fn post_route_modify(
        &self,
        request: Request<PostRouteModifyRequest>,
    ) -> std::result::Result<Response<PostRouteModifyResponse>, Status> {
        respond("PostRouteModify", GatewayExtension::post_route_modify(self, request.into_inner()).await)
    }

    async fn post_virtual_host_modify(
        &self,
        request: Request<PostVirtualHostModifyRequest>,
    ) -> std::result::Result<Response<PostVirtualHostModifyResponse>, Status> {
        respond(
            "PostVirtualHostModify",
            GatewayExtension::post_virtual_host_modify(self, request.into_inner()).await,
        )
    }

    async fn post_http_listener_modify(
        &self,
        request: Request<PostHttpListenerModifyRequest>,
    ) -> std::result::Result<Response<PostHttpListenerModifyResponse>, Status> {
        respond(
            "PostHTTPListenerModify",
            GatewayExtension::post_http_listener_modify(self, request.into_inner()).await,
        )
    }

    async fn post_translate_modify(
        &self,
        request: Request<PostTranslateModifyRequest>,
    ) -> std::result::Result<Response<PostTranslateModifyResponse>, Status> {
        respond(
            "PostTranslateModify",
            GatewayExtension::post_translate_modify(self, request.into_inner()).await,
        )
    }
}
