//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, StoreBackend};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use onboarding_backend::Trace;
#[cfg(debug_assertions)]
use onboarding_backend::doc::ApiDoc;
use onboarding_backend::inbound::http::contracts::{
    contract_timeline, contracts_by_user, list_contracts, start_contract,
};
use onboarding_backend::inbound::http::health::{HealthState, banner, live, ready};
use onboarding_backend::inbound::http::roles::workflow_roles;
use onboarding_backend::inbound::http::state::HttpState;
use onboarding_backend::inbound::http::tasks::{complete_task, list_tasks, pending_tasks};
use onboarding_backend::inbound::http::units::{create_unit, delete_unit, list_units, update_unit};
use onboarding_backend::inbound::http::users::{
    create_user, delete_user, get_user, list_users, update_user,
};
use onboarding_backend::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api")
        .service(banner)
        .service(workflow_roles)
        .service(start_contract)
        .service(list_contracts)
        .service(contracts_by_user)
        .service(contract_timeline)
        .service(list_tasks)
        .service(pending_tasks)
        .service(complete_task)
        .service(list_users)
        .service(create_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(list_units)
        .service(create_unit)
        .service(update_unit)
        .service(delete_unit);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server for `config`.
///
/// Readiness flips to true once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
