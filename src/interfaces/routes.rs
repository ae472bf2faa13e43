use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod auth;
mod json_error;
mod site;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(site::config_routes)
            .configure(admin::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
