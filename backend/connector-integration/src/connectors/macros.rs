macro_rules! expand_fn_get_request_body {
    (
        $connector: ty,
        $soap_call: expr,
        $curl_req: ty,
        $flow: ident,
        $resource_common_data: ty,
        $request: ty,
        $response: ty
    ) => {
        fn get_request_body(
            &self,
            req: &RouterDataV2<$flow, $resource_common_data, $request, $response>,
        ) -> CustomResult<Option<macro_types::RequestContent>, macro_types::ConnectorError> {
            let connector_req = <$curl_req>::try_from(VindiciaRouterData {
                amount_converter: self.amount_converter,
                router_data: req,
            })?;
            Ok(Some(soap::build_envelope($soap_call, &connector_req)?))
        }
    };
}
pub(crate) use expand_fn_get_request_body;

macro_rules! expand_fn_handle_response {
    ($connector: ty, $curl_res: ty, $flow: ident, $resource_common_data: ty, $request: ty, $response: ty) => {
        fn handle_response_v2(
            &self,
            data: &RouterDataV2<$flow, $resource_common_data, $request, $response>,
            res: Response,
        ) -> CustomResult<
            RouterDataV2<$flow, $resource_common_data, $request, $response>,
            macro_types::ConnectorError,
        > {
            let response = <$curl_res>::try_from(soap::SoapResponse::parse(&res.response)?)?;
            $crate::with_response_body!(self.id(), response);

            RouterDataV2::<$flow, $resource_common_data, $request, $response>::try_from(
                ResponseRouterData {
                    response,
                    router_data: data.clone(),
                    http_code: res.status_code,
                },
            )
        }
    };
}
pub(crate) use expand_fn_handle_response;

macro_rules! expand_default_functions {
    (
        function: get_headers,
        soap_call: $soap_call: expr,
        flow_name:$flow: ident,
        resource_common_data:$resource_common_data: ty,
        flow_request:$request: ty,
        flow_response:$response: ty,
    ) => {
        fn get_headers(
            &self,
            req: &RouterDataV2<$flow, $resource_common_data, $request, $response>,
        ) -> macro_types::CustomResult<
            Vec<(String, macro_types::Maskable<String>)>,
            macro_types::ConnectorError,
        > {
            self.build_headers(req, $soap_call)
        }
    };
    (
        function: get_content_type,
        soap_call: $soap_call: expr,
        flow_name:$flow: ident,
        resource_common_data:$resource_common_data: ty,
        flow_request:$request: ty,
        flow_response:$response: ty,
    ) => {
        fn get_content_type(&self) -> &'static str {
            self.common_get_content_type()
        }
    };
    (
        function: get_url,
        soap_call: $soap_call: expr,
        flow_name:$flow: ident,
        resource_common_data:$resource_common_data: ty,
        flow_request:$request: ty,
        flow_response:$response: ty,
    ) => {
        fn get_url(
            &self,
            req: &RouterDataV2<$flow, $resource_common_data, $request, $response>,
        ) -> macro_types::CustomResult<String, macro_types::ConnectorError> {
            Ok(format!(
                "{}{}",
                self.base_url(
                    &req.resource_common_data.connectors,
                    req.resource_common_data.test_mode,
                ),
                soap::ENDPOINT_PATH
            ))
        }
    };
}
pub(crate) use expand_default_functions;

/// Implements one SOAP call of a connector as a [`ConnectorIntegrationV2`] flow.
macro_rules! macro_connector_implementation {
    (
        connector_default_implementations: [$($function_name: ident), *],
        connector: $connector: ty,
        soap_call: $soap_call: expr,
        curl_request: $curl_req: ty,
        curl_response: $curl_res: ty,
        flow_name: $flow: ident,
        resource_common_data: $resource_common_data: ty,
        flow_request: $request: ty,
        flow_response: $response: ty,
        http_method: $http_method_type: ident,
        other_functions: {
            $($function_def: tt)*
        }
    ) => {
        impl
            ConnectorIntegrationV2<
                $flow,
                $resource_common_data,
                $request,
                $response,
            > for $connector
        {
            fn get_http_method(&self) -> common_utils::request::Method {
                common_utils::request::Method::$http_method_type
            }
            $($function_def)*
            $(
                macros::expand_default_functions!(
                    function: $function_name,
                    soap_call: $soap_call,
                    flow_name:$flow,
                    resource_common_data:$resource_common_data,
                    flow_request:$request,
                    flow_response:$response,
                );
            )*
            macros::expand_fn_get_request_body!(
                $connector,
                $soap_call,
                $curl_req,
                $flow,
                $resource_common_data,
                $request,
                $response
            );
            macros::expand_fn_handle_response!(
                $connector,
                $curl_res,
                $flow,
                $resource_common_data,
                $request,
                $response
            );
        }
    };
}
pub(crate) use macro_connector_implementation;

macro_rules! expand_imports {
    () => {
        #[allow(unused_imports)]
        mod macro_types {
            pub(super) use common_utils::{errors::CustomResult, request::RequestContent};
            pub(super) use domain_types::errors::ConnectorError;
            pub(super) use hyperswitch_masking::Maskable;
        }
    };
}
pub(crate) use expand_imports;
