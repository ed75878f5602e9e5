//! The resources this server exposes.
//!
//! | method    | target   | resource                                  |
//! |-----------|----------|-------------------------------------------|
//! | `GET`     | `/`      | "It works" page                           |
//! | `GET`     | `/live`  | liveness document                         |
//! | `GET`     | `/ready` | readiness document                        |
//! | `GET`     | `/spec`  | gzip compressed protocol notes            |
//! | `GET`     | `/page`  | page loading `/app.js`                    |
//! | `GET`     | `/app.js`| script for `/page`                        |
//! | `POST`    | `/echo`  | request body echoed back                  |
//! | `OPTIONS` | `*`      | ping                                      |
//! | `TRACE`   | any      | request head echoed back                  |

mod echo;
mod health;
mod pages;
mod spec;

use crate::handler_fn;
use crate::router::{Router, get, options, post};

pub fn router() -> Result<Router, matchit::InsertError> {
    Router::builder()
        .route("/", get(handler_fn(pages::index)))
        .route("/page", get(handler_fn(pages::page)))
        .route("/app.js", get(handler_fn(pages::app_js)))
        .route("/live", get(handler_fn(health::status)))
        .route("/ready", get(handler_fn(health::status)))
        .route("/spec", get(handler_fn(spec::protocol_notes)))
        .route("/echo", post(handler_fn(echo::echo)))
        .asterisk(options(handler_fn(echo::ping)))
        .trace(handler_fn(echo::trace))
        .build()
}
