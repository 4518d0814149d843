//! http — the capability contract over a REST service.
//!
//! | Action | Method | Path                 | Query                                    |
//! |--------|--------|----------------------|------------------------------------------|
//! | create | POST   | `{base}/{entity}/`   |                                          |
//! | read   | GET    | `{base}/{entity}/{id}` | `preload[k]=v`                         |
//! | update | PUT    | `{base}/{entity}/{id}` |                                        |
//! | delete | DELETE | `{base}/{entity}/{id}` |                                        |
//! | search | GET    | `{base}/{entity}/`   | `skip`, `take`, `where[..]`, `sort[..]`, `preload[..]`, filters |
//! | patch  | PATCH  | `{base}/{entity}/`   | `preload[k]=v`                           |
//!
//! Any non-2xx status becomes an error; a 2xx body is handed back as-is.

mod proxy;
mod query;
mod transport;

pub use proxy::HttpProxy;
pub use query::{filters_to_query, map_to_query, search_query};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
