//! Generic binder: typed backend method → [`Handler`].

use serde::Serialize;
use tracing::warn;

use super::envelope::{ErrorObject, Request, Response};
use super::registry::Handler;
use crate::api::{empty_object, Params, ProxyError};

/// Bind a method that returns a value.
///
/// Params that fail to decode produce a parse error and the method is not
/// called. A failing `Params::check` or a backend error produces an error
/// response. Either way the response carries the request's id.
pub fn bind<Req, Res, F>(method: F) -> Handler
where
    Req: Params,
    Res: Serialize,
    F: Fn(Req) -> Result<Res, ProxyError> + Send + Sync + 'static,
{
    Box::new(move |request: &Request| {
        let params = match decode::<Req>(request) {
            Ok(params) => params,
            Err(response) => return response,
        };

        let outcome = method(params).and_then(|res| {
            serde_json::value::to_raw_value(&res).map_err(|e| ProxyError::Encode(e.to_string()))
        });

        match outcome {
            Ok(raw) => Response::result(request.id.clone(), raw),
            Err(err) => {
                warn!(method = %request.method, id = %request.id, error = %err, "backend call failed");
                Response::error(request.id.clone(), ErrorObject::from(&err))
            }
        }
    })
}

/// Bind a method with no return value; success is answered with `{}`.
pub fn bind_unit<Req, F>(method: F) -> Handler
where
    Req: Params,
    F: Fn(Req) -> Result<(), ProxyError> + Send + Sync + 'static,
{
    bind(move |req: Req| method(req).and_then(|()| empty_object()))
}

fn decode<Req: Params>(request: &Request) -> Result<Req, Response> {
    let Some(params) = request.params.as_ref() else {
        warn!(method = %request.method, id = %request.id, "missing params");
        return Err(Response::error(
            request.id.clone(),
            ErrorObject::parse_error("missing params"),
        ));
    };

    let decoded: Req = serde_json::from_str(params.get()).map_err(|e| {
        warn!(method = %request.method, id = %request.id, error = %e, "params decode failed");
        Response::error(request.id.clone(), ErrorObject::parse_error(e.to_string()))
    })?;

    decoded
        .check()
        .map_err(|err| Response::error(request.id.clone(), ErrorObject::from(&err)))?;

    Ok(decoded)
}
