//! Hook DTOs

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters of `POST /hooks/gitlab`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HookQuery {
    /// Destination override: `ops`, `#ops` or `@user`
    pub channel: Option<String>,
}
