use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        api::list_themes,
        api::framed_avatar,
    ),
    components(
        schemas(api::HealthResponse, crate::themes::ThemeRecord)
    ),
    tags(
        (name = "framegen", description = "framegen backend API")
    )
)]
pub struct ApiDoc;
