//! Worker entry point
//!
//! Every request is handed to the asset binding (`ASSETS` unless renamed) as-is and its answer is
//! returned as-is. Status codes, headers and errors all come from the binding.

use super::{Context, Env, Request, Response, Result};

pub async fn fetch(req: Request, env: &Env, _ctx: &Context) -> Result<Response> {
    env.assets()?.fetch(req).await
}
