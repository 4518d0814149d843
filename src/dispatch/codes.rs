//! JSON-RPC error codes.

/// The params (or the whole envelope) are not valid JSON of the expected shape.
pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Decoded fine but unusable: empty id, failed validation.
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

// Implementation-defined server errors.
pub const SERVER_ERROR: i64 = -32000;
pub const NOT_FOUND: i64 = -32001;
/// Non-2xx status, transport failure, timeout.
pub const UPSTREAM_ERROR: i64 = -32002;
