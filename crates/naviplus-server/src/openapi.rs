use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Naviplus API",
        version = "0.1.0",
        description = "Building accessibility metadata: buildings, their entrances (PLDs), and per-user disability profiles."
    ),
    paths(
        crate::routes::api_root,
        crate::routes::list_buildings,
        crate::routes::create_building,
        crate::routes::get_building,
        crate::routes::update_building,
        crate::routes::partial_update_building,
        crate::routes::delete_building,
        crate::routes::list_plds,
        crate::routes::create_pld,
        crate::routes::get_pld,
        crate::routes::update_pld,
        crate::routes::partial_update_pld,
        crate::routes::delete_pld,
        crate::routes::list_profiles,
        crate::routes::create_profile,
        crate::routes::get_profile,
        crate::routes::update_profile,
        crate::routes::partial_update_profile,
        crate::routes::delete_profile,
        crate::routes::signup,
        crate::routes::login,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::BuildingRequest,
        crate::dto::BuildingResponse,
        crate::dto::PldRequest,
        crate::dto::PldResponse,
        crate::dto::ProfileRequest,
        crate::dto::ProfileResponse,
        crate::dto::CredentialsRequest,
        crate::dto::TokenResponse,
        crate::dto::ApiRootResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "buildings", description = "Building collection"),
        (name = "plds", description = "Building entrances"),
        (name = "user-profiles", description = "The caller's disability profiles"),
        (name = "accounts", description = "Signup and token login"),
        (name = "system", description = "Router index and health"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the token scheme referenced by the protected paths.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("token")
                        .description(Some(
                            "Key returned by /api/signup/ or /api/login/. `Authorization: Token <key>` is accepted as well.",
                        ))
                        .build(),
                ),
            );
        }
    }
}
